// src/db/filial_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::filial::{Filial, FilialMembro, PapelMembro},
};

#[derive(Clone)]
pub struct FilialRepository {
    pool: PgPool,
}

impl FilialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca o vínculo de um usuário com uma filial.
    /// Esta é a verificação de autorização mais importante do sistema:
    /// é ela que decide se o escopo pode sequer ser construído.
    pub async fn buscar_membro(
        &self,
        usuario_id: Uuid,
        filial_id: Uuid,
    ) -> Result<Option<FilialMembro>, AppError> {
        let membro = sqlx::query_as::<_, FilialMembro>(
            "SELECT * FROM filial_membros WHERE usuario_id = $1 AND filial_id = $2",
        )
        .bind(usuario_id)
        .bind(filial_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membro)
    }

    pub async fn buscar_filial(&self, filial_id: Uuid) -> Result<Option<Filial>, AppError> {
        let filial = sqlx::query_as::<_, Filial>("SELECT * FROM filiais WHERE id = $1")
            .bind(filial_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(filial)
    }

    /// Cria uma nova filial.
    pub async fn criar_filial<'e, E>(
        &self,
        executor: E,
        nome: &str,
        cnpj: Option<&str>,
        cidade: Option<&str>,
    ) -> Result<Filial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filial = sqlx::query_as::<_, Filial>(
            r#"
            INSERT INTO filiais (nome, cnpj, cidade)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(cnpj)
        .bind(cidade)
        .fetch_one(executor)
        .await?;
        Ok(filial)
    }

    /// Vincula um usuário a uma filial com o papel dado.
    pub async fn adicionar_membro<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        usuario_id: Uuid,
        papel: PapelMembro,
    ) -> Result<FilialMembro, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, FilialMembro>(
            r#"
            INSERT INTO filial_membros (usuario_id, filial_id, papel)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(filial_id)
        .bind(papel)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::MembroJaExiste;
                }
            }
            e.into()
        })
    }

    /// Filiais às quais o usuário pertence.
    pub async fn listar_filiais_do_usuario(
        &self,
        usuario_id: Uuid,
    ) -> Result<Vec<Filial>, AppError> {
        let filiais = sqlx::query_as::<_, Filial>(
            r#"
            SELECT f.* FROM filiais f
            INNER JOIN filial_membros fm ON fm.filial_id = f.id
            WHERE fm.usuario_id = $1
            ORDER BY f.nome ASC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(filiais)
    }

    pub async fn listar_membros(&self, filial_id: Uuid) -> Result<Vec<FilialMembro>, AppError> {
        let membros = sqlx::query_as::<_, FilialMembro>(
            "SELECT * FROM filial_membros WHERE filial_id = $1 ORDER BY created_at ASC",
        )
        .bind(filial_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(membros)
    }
}

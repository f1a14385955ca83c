// src/db/ativo_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    models::ativo::{Ativo, StatusAtivo, TipoAtivo},
};

#[derive(Clone)]
pub struct AtivoRepository {
    pool: PgPool,
}

impl AtivoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        tipo: Option<TipoAtivo>,
        status: Option<StatusAtivo>,
    ) -> Result<Vec<Ativo>, AppError> {
        let ativos = sqlx::query_as::<_, Ativo>(
            r#"
            SELECT * FROM ativos
            WHERE ($1::uuid IS NULL OR filial_id = $1)
              AND ($2::tipo_ativo IS NULL OR tipo = $2)
              AND ($3::status_ativo IS NULL OR status = $3)
            ORDER BY nome ASC
            "#,
        )
        .bind(escopo.filtro())
        .bind(tipo)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(ativos)
    }

    pub async fn buscar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Ativo>, AppError> {
        let ativo = sqlx::query_as::<_, Ativo>(
            r#"
            SELECT * FROM ativos
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ativo)
    }

    /// Versão com trava de linha, para a transação de retirada/devolução.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Ativo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ativo = sqlx::query_as::<_, Ativo>(
            r#"
            SELECT * FROM ativos
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(ativo)
    }

    /// Checagem barata usada na validação de dono de documento.
    pub async fn existe(&self, escopo: EscopoFilial, id: Uuid) -> Result<bool, AppError> {
        let existe: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM ativos
                WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            )
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn criar<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        tipo: TipoAtivo,
        nome: &str,
        codigo_identificacao: &str,
        patrimonio: Option<&str>,
        placa: Option<&str>,
        hodometro: Option<Decimal>,
        localizacao_padrao: Option<&str>,
        observacoes: Option<&str>,
    ) -> Result<Ativo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ativo>(
            r#"
            INSERT INTO ativos
                (filial_id, tipo, nome, codigo_identificacao, patrimonio, placa,
                 hodometro, localizacao_padrao, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(filial_id)
        .bind(tipo)
        .bind(nome)
        .bind(codigo_identificacao)
        .bind(patrimonio)
        .bind(placa)
        .bind(hodometro)
        .bind(localizacao_padrao)
        .bind(observacoes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodigoJaExiste(codigo_identificacao.to_string());
                }
            }
            e.into()
        })
    }

    /// Atualiza o status (e, para veículos, o hodômetro) dentro da transação
    /// de movimentação.
    pub async fn atualizar_situacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: StatusAtivo,
        hodometro: Option<Decimal>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE ativos
            SET status = $2,
                hodometro = COALESCE($3, hodometro),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(hodometro)
        .execute(executor)
        .await?;
        Ok(())
    }
}

// src/db/funcionario_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    models::funcionario::Funcionario,
};

// Todas as leituras e escritas exigem um EscopoFilial: não existe método
// sem escopo neste repositório.
#[derive(Clone)]
pub struct FuncionarioRepository {
    pool: PgPool,
}

impl FuncionarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self, escopo: EscopoFilial) -> Result<Vec<Funcionario>, AppError> {
        let funcionarios = sqlx::query_as::<_, Funcionario>(
            r#"
            SELECT * FROM funcionarios
            WHERE ($1::uuid IS NULL OR filial_id = $1)
            ORDER BY nome_completo ASC
            "#,
        )
        .bind(escopo.filtro())
        .fetch_all(&self.pool)
        .await?;
        Ok(funcionarios)
    }

    pub async fn buscar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Funcionario>, AppError> {
        let funcionario = sqlx::query_as::<_, Funcionario>(
            r#"
            SELECT * FROM funcionarios
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(funcionario)
    }

    /// Checagem barata usada na validação de dono de documento.
    pub async fn existe(&self, escopo: EscopoFilial, id: Uuid) -> Result<bool, AppError> {
        let existe: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM funcionarios
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

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        nome_completo: &str,
        matricula: &str,
        cargo: Option<&str>,
        data_admissao: Option<NaiveDate>,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            INSERT INTO funcionarios (filial_id, nome_completo, matricula, cargo, data_admissao)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(filial_id)
        .bind(nome_completo)
        .bind(matricula)
        .bind(cargo)
        .bind(data_admissao)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::MatriculaJaExiste(matricula.to_string());
                }
            }
            e.into()
        })
    }

    /// Desligamento: o registro fica, apenas deixa de estar ativo.
    pub async fn desativar(&self, escopo: EscopoFilial, id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE funcionarios
            SET ativo = FALSE, updated_at = now()
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::FuncionarioNaoEncontrado);
        }
        Ok(())
    }
}

// src/db/movimentacao_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    models::ativo::Movimentacao,
};

#[derive(Clone)]
pub struct MovimentacaoRepository {
    pool: PgPool,
}

impl MovimentacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        apenas_abertas: bool,
        ativo_id: Option<Uuid>,
    ) -> Result<Vec<Movimentacao>, AppError> {
        let movimentacoes = sqlx::query_as::<_, Movimentacao>(
            r#"
            SELECT * FROM movimentacoes
            WHERE ($1::uuid IS NULL OR filial_id = $1)
              AND (NOT $2 OR data_devolucao IS NULL)
              AND ($3::uuid IS NULL OR ativo_id = $3)
            ORDER BY data_retirada DESC
            "#,
        )
        .bind(escopo.filtro())
        .bind(apenas_abertas)
        .bind(ativo_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimentacoes)
    }

    pub async fn buscar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Movimentacao>, AppError> {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            r#"
            SELECT * FROM movimentacoes
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movimentacao)
    }

    /// Versão com trava de linha, para a transação de devolução.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Movimentacao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            r#"
            SELECT * FROM movimentacoes
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(movimentacao)
    }

    /// Abre uma movimentação (retirada).
    /// O índice único parcial `idx_uma_movimentacao_aberta_por_ativo` é a
    /// garantia final contra duas retiradas simultâneas do mesmo ativo:
    /// a violação vira `AtivoJaRetirado`.
    #[allow(clippy::too_many_arguments)]
    pub async fn abrir<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        ativo_id: Uuid,
        retirado_por: Uuid,
        data_devolucao_prevista: DateTime<Utc>,
        condicoes_retirada: &str,
        assinatura_retirada: &str,
        km_inicial: Option<Decimal>,
    ) -> Result<Movimentacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Movimentacao>(
            r#"
            INSERT INTO movimentacoes
                (filial_id, ativo_id, retirado_por, data_devolucao_prevista,
                 condicoes_retirada, assinatura_retirada, km_inicial)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(filial_id)
        .bind(ativo_id)
        .bind(retirado_por)
        .bind(data_devolucao_prevista)
        .bind(condicoes_retirada)
        .bind(assinatura_retirada)
        .bind(km_inicial)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::AtivoJaRetirado;
                }
            }
            e.into()
        })
    }

    /// Encerra a movimentação. `data_devolucao IS NULL` no WHERE garante que
    /// o fechamento só acontece uma vez; zero linhas afetadas significa que
    /// alguém encerrou antes.
    #[allow(clippy::too_many_arguments)]
    pub async fn encerrar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data_devolucao: DateTime<Utc>,
        recebido_por: Uuid,
        condicoes_devolucao: Option<&str>,
        assinatura_devolucao: Option<&str>,
        km_final: Option<Decimal>,
    ) -> Result<Option<Movimentacao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            r#"
            UPDATE movimentacoes
            SET data_devolucao = $2,
                recebido_por = $3,
                condicoes_devolucao = $4,
                assinatura_devolucao = $5,
                km_final = $6
            WHERE id = $1 AND data_devolucao IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data_devolucao)
        .bind(recebido_por)
        .bind(condicoes_devolucao)
        .bind(assinatura_devolucao)
        .bind(km_final)
        .fetch_optional(executor)
        .await?;
        Ok(movimentacao)
    }
}

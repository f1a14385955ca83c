// src/db/documento_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    models::documento::{Documento, DocumentoTransicionado, StatusDocumento, TipoDono},
};

#[derive(Clone)]
pub struct DocumentoRepository {
    pool: PgPool,
}

impl DocumentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (sempre escopadas)
    // ---

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        status: Option<StatusDocumento>,
        dono_tipo: Option<TipoDono>,
        dono_id: Option<Uuid>,
    ) -> Result<Vec<Documento>, AppError> {
        // Ordena pelos vencimentos mais próximos primeiro, como a listagem antiga
        let documentos = sqlx::query_as::<_, Documento>(
            r#"
            SELECT * FROM documentos
            WHERE ($1::uuid IS NULL OR filial_id = $1)
              AND ($2::status_documento IS NULL OR status = $2)
              AND ($3::tipo_dono IS NULL OR dono_tipo = $3)
              AND ($4::uuid IS NULL OR dono_id = $4)
            ORDER BY data_vencimento ASC NULLS LAST, nome ASC
            "#,
        )
        .bind(escopo.filtro())
        .bind(status)
        .bind(dono_tipo)
        .bind(dono_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documentos)
    }

    pub async fn buscar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Documento>, AppError> {
        let documento = sqlx::query_as::<_, Documento>(
            r#"
            SELECT * FROM documentos
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(documento)
    }

    /// Versão com trava de linha, para usar dentro da transação de renovação.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Option<Documento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documento = sqlx::query_as::<_, Documento>(
            r#"
            SELECT * FROM documentos
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(documento)
    }

    // ---
    // Escritas
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn criar<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        nome: &str,
        arquivo: &str,
        data_emissao: Option<NaiveDate>,
        data_vencimento: Option<NaiveDate>,
        status: StatusDocumento,
        responsavel_id: Option<Uuid>,
        dono_tipo: TipoDono,
        dono_id: Uuid,
        substitui_id: Option<Uuid>,
    ) -> Result<Documento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documento = sqlx::query_as::<_, Documento>(
            r#"
            INSERT INTO documentos
                (filial_id, nome, arquivo, data_emissao, data_vencimento, status,
                 responsavel_id, dono_tipo, dono_id, substitui_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(filial_id)
        .bind(nome)
        .bind(arquivo)
        .bind(data_emissao)
        .bind(data_vencimento)
        .bind(status)
        .bind(responsavel_id)
        .bind(dono_tipo)
        .bind(dono_id)
        .bind(substitui_id)
        .fetch_one(executor)
        .await?;
        Ok(documento)
    }

    /// Marca o documento antigo como RENOVADO.
    /// O `status <> 'RENOVADO'` no WHERE faz o papel de guarda: zero linhas
    /// afetadas significa renovação dupla, e o serviço aborta a transação.
    pub async fn marcar_renovado<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE documentos
            SET status = 'RENOVADO', updated_at = now()
            WHERE id = $1 AND status <> 'RENOVADO'
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn excluir(&self, escopo: EscopoFilial, id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query(
            r#"
            DELETE FROM documentos
            WHERE ($1::uuid IS NULL OR filial_id = $1) AND id = $2
            "#,
        )
        .bind(escopo.filtro())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::DocumentoNaoEncontrado);
        }
        Ok(())
    }

    // ---
    // Varreduras da rotina de vencimentos
    // ---
    // As três varreduras são idempotentes e independentes de ordem: repetir a
    // execução com o mesmo "hoje" não transiciona nada de novo. RENOVADO nunca
    // aparece em nenhum WHERE, então nunca é tocado.

    /// VIGENTE/A_VENCER com vencimento no passado -> VENCIDO.
    pub async fn marcar_vencidos<'e, E>(
        &self,
        executor: E,
        hoje: NaiveDate,
    ) -> Result<Vec<DocumentoTransicionado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transicionados = sqlx::query_as::<_, DocumentoTransicionado>(
            r#"
            UPDATE documentos
            SET status = 'VENCIDO', updated_at = now()
            WHERE data_vencimento < $1
              AND status IN ('VIGENTE', 'A_VENCER')
            RETURNING id, nome, data_vencimento, responsavel_id
            "#,
        )
        .bind(hoje)
        .fetch_all(executor)
        .await?;
        Ok(transicionados)
    }

    /// VIGENTE com vencimento dentro da janela de aviso -> A_VENCER.
    pub async fn marcar_a_vencer<'e, E>(
        &self,
        executor: E,
        hoje: NaiveDate,
        limite_aviso: NaiveDate,
    ) -> Result<Vec<DocumentoTransicionado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transicionados = sqlx::query_as::<_, DocumentoTransicionado>(
            r#"
            UPDATE documentos
            SET status = 'A_VENCER', updated_at = now()
            WHERE data_vencimento >= $1
              AND data_vencimento <= $2
              AND status = 'VIGENTE'
            RETURNING id, nome, data_vencimento, responsavel_id
            "#,
        )
        .bind(hoje)
        .bind(limite_aviso)
        .fetch_all(executor)
        .await?;
        Ok(transicionados)
    }

    /// A_VENCER/VENCIDO cuja data saiu da janela (ex.: vencimento corrigido
    /// para o futuro) volta a VIGENTE, mantendo a varredura convergente.
    pub async fn revigorar<'e, E>(
        &self,
        executor: E,
        limite_aviso: NaiveDate,
    ) -> Result<Vec<DocumentoTransicionado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transicionados = sqlx::query_as::<_, DocumentoTransicionado>(
            r#"
            UPDATE documentos
            SET status = 'VIGENTE', updated_at = now()
            WHERE (data_vencimento > $1 OR data_vencimento IS NULL)
              AND status IN ('A_VENCER', 'VENCIDO')
            RETURNING id, nome, data_vencimento, responsavel_id
            "#,
        )
        .bind(limite_aviso)
        .fetch_all(executor)
        .await?;
        Ok(transicionados)
    }
}

// src/db/notificacao_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::notificacao::Notificacao};

#[derive(Clone)]
pub struct NotificacaoRepository {
    pool: PgPool,
}

impl NotificacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(
        &self,
        usuario_id: Uuid,
        mensagem: &str,
    ) -> Result<Notificacao, AppError> {
        let notificacao = sqlx::query_as::<_, Notificacao>(
            r#"
            INSERT INTO notificacoes (usuario_id, mensagem)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(mensagem)
        .fetch_one(&self.pool)
        .await?;
        Ok(notificacao)
    }

    pub async fn listar_do_usuario(
        &self,
        usuario_id: Uuid,
        apenas_nao_lidas: bool,
    ) -> Result<Vec<Notificacao>, AppError> {
        let notificacoes = sqlx::query_as::<_, Notificacao>(
            r#"
            SELECT * FROM notificacoes
            WHERE usuario_id = $1 AND (NOT $2 OR lida = FALSE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(usuario_id)
        .bind(apenas_nao_lidas)
        .fetch_all(&self.pool)
        .await?;
        Ok(notificacoes)
    }

    /// Só o destinatário marca a própria notificação como lida.
    pub async fn marcar_lida(&self, id: Uuid, usuario_id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query(
            "UPDATE notificacoes SET lida = TRUE WHERE id = $1 AND usuario_id = $2",
        )
        .bind(id)
        .bind(usuario_id)
        .execute(&self.pool)
        .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::NotificacaoNaoEncontrada);
        }
        Ok(())
    }
}

// src/jobs/vencimentos.rs

use chrono::Utc;
use sqlx::Connection;

use crate::{common::error::AppError, config::AppState};

// Chave do advisory lock que serializa a rotina entre instâncias da API.
// Valor arbitrário, mas fixo: todas as instâncias precisam usar o mesmo.
const CHAVE_LOCK_VENCIMENTOS: i64 = 742_001_001;

/// Sobe a rotina diária de vencimentos em uma task de fundo.
/// Cada ciclo tenta o lock no banco; a instância que perder simplesmente
/// pula a rodada (outra instância já está varrendo).
pub fn iniciar(state: AppState) {
    tokio::spawn(async move {
        let mut intervalo = tokio::time::interval(state.intervalo_verificacao);

        loop {
            intervalo.tick().await;

            if let Err(e) = executar_ciclo(&state).await {
                tracing::error!("Rotina de vencimentos falhou: {}", e);
            }
        }
    });
}

async fn executar_ciclo(state: &AppState) -> Result<(), AppError> {
    // Conexão dedicada: o lock de sessão precisa viver na mesma conexão
    // do unlock, o que uma pool não garante entre queries soltas
    let mut conn = state.db_pool.acquire().await?;

    let (obtido,): (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .bind(CHAVE_LOCK_VENCIMENTOS)
        .fetch_one(&mut *conn)
        .await?;

    if !obtido {
        tracing::debug!("Outra instância está executando a rotina de vencimentos; pulando.");
        return Ok(());
    }

    let resultado = state
        .documento_service
        .recomputar_vencimentos(Utc::now().date_naive(), None)
        .await;

    // O unlock roda mesmo se a varredura falhar; sem ele o lock de sessão
    // sobreviveria na conexão devolvida à pool
    let unlock = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(CHAVE_LOCK_VENCIMENTOS)
        .execute(&mut *conn)
        .await;

    if let Err(e) = unlock {
        // Conexão possivelmente quebrada; fecha em vez de devolver à pool
        tracing::error!("Falha ao liberar o lock de vencimentos: {}", e);
        let _ = conn.detach().close().await;
    }

    let resumo = resultado?;
    tracing::info!(
        "Rotina de vencimentos: {} vencidos, {} a vencer, {} revigorados.",
        resumo.vencidos,
        resumo.a_vencer,
        resumo.revigorados
    );

    Ok(())
}

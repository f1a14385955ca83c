// src/services/notificacao_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{common::error::AppError, db::NotificacaoRepository, models::notificacao::Notificacao};

// ---
// Canal de entrega
// ---
// O sistema antigo entregava avisos por dois caminhos (sino interno e e-mail).
// Aqui cada caminho é um canal; o serviço dispara em todos e segue em frente.
#[async_trait]
pub trait CanalNotificacao: Send + Sync {
    fn nome(&self) -> &'static str;
    async fn enviar(&self, usuario_id: Uuid, mensagem: &str) -> Result<(), AppError>;
}

/// Canal padrão: grava a notificação no banco (o "sino" da interface).
pub struct CanalBanco {
    repo: NotificacaoRepository,
}

impl CanalBanco {
    pub fn new(repo: NotificacaoRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CanalNotificacao for CanalBanco {
    fn nome(&self) -> &'static str {
        "banco"
    }

    async fn enviar(&self, usuario_id: Uuid, mensagem: &str) -> Result<(), AppError> {
        self.repo.criar(usuario_id, mensagem).await?;
        Ok(())
    }
}

// ---
// Serviço
// ---
#[derive(Clone)]
pub struct NotificacaoService {
    repo: NotificacaoRepository,
    canais: Vec<Arc<dyn CanalNotificacao>>,
}

impl NotificacaoService {
    pub fn new(repo: NotificacaoRepository, canais: Vec<Arc<dyn CanalNotificacao>>) -> Self {
        Self { repo, canais }
    }

    /// Dispara-e-esquece: falha de entrega é logada e NUNCA propaga para a
    /// operação de negócio que originou o aviso.
    pub async fn notificar(&self, usuario_id: Option<Uuid>, mensagem: &str) {
        let Some(usuario_id) = usuario_id else {
            // Documento sem responsável: ninguém para avisar.
            return;
        };

        for canal in &self.canais {
            if let Err(e) = canal.enviar(usuario_id, mensagem).await {
                tracing::warn!(
                    "Falha ao notificar usuário {} pelo canal '{}': {}",
                    usuario_id,
                    canal.nome(),
                    e
                );
            }
        }
    }

    pub async fn listar(
        &self,
        usuario_id: Uuid,
        apenas_nao_lidas: bool,
    ) -> Result<Vec<Notificacao>, AppError> {
        self.repo.listar_do_usuario(usuario_id, apenas_nao_lidas).await
    }

    pub async fn marcar_lida(&self, id: Uuid, usuario_id: Uuid) -> Result<(), AppError> {
        self.repo.marcar_lida(id, usuario_id).await
    }
}

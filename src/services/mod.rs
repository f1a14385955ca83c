// src/services/mod.rs

pub mod arquivo_service;
pub mod ativo_service;
pub mod auth;
pub mod documento_service;
pub mod filial_service;
pub mod funcionario_service;
pub mod movimentacao_service;
pub mod notificacao_service;
pub mod termo_service;

pub use arquivo_service::ArquivoService;
pub use ativo_service::AtivoService;
pub use auth::AuthService;
pub use documento_service::DocumentoService;
pub use filial_service::FilialService;
pub use funcionario_service::FuncionarioService;
pub use movimentacao_service::MovimentacaoService;
pub use notificacao_service::{CanalBanco, CanalNotificacao, NotificacaoService};
pub use termo_service::TermoService;

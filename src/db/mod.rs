// src/db/mod.rs

mod ativo_repo;
mod documento_repo;
mod filial_repo;
mod funcionario_repo;
mod movimentacao_repo;
mod notificacao_repo;
mod user_repo;

pub use ativo_repo::AtivoRepository;
pub use documento_repo::DocumentoRepository;
pub use filial_repo::FilialRepository;
pub use funcionario_repo::FuncionarioRepository;
pub use movimentacao_repo::MovimentacaoRepository;
pub use notificacao_repo::NotificacaoRepository;
pub use user_repo::UserRepository;

pub mod ativo;
pub mod auth;
pub mod documento;
pub mod filial;
pub mod funcionario;
pub mod notificacao;

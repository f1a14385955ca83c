// src/handlers/mod.rs

pub mod ativos;
pub mod auth;
pub mod documentos;
pub mod filiais;
pub mod funcionarios;
pub mod movimentacoes;
pub mod notificacoes;

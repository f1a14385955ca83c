// src/jobs/mod.rs

pub mod vencimentos;

// src/middleware/mod.rs

pub mod auth;
pub mod rbac;
pub mod tenancy;

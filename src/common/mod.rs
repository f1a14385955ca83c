pub mod error;
pub mod escopo;

// src/models/filial.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Filial (a unidade organizacional que segrega os dados)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Filial {
    pub id: Uuid,
    pub nome: String,
    pub cnpj: Option<String>,
    pub cidade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Papel do membro dentro da filial
// ---
// GESTOR pode administrar membros e excluir documentos de terceiros.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "papel_membro", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PapelMembro {
    Gestor,
    Membro,
}

// ---
// 3. FilialMembro (a "ponte" Usuário-Filial)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilialMembro {
    pub usuario_id: Uuid,
    pub filial_id: Uuid,
    pub papel: PapelMembro,
    pub created_at: DateTime<Utc>,
}

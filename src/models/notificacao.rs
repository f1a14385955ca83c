// src/models/notificacao.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Aviso interno entregue ao responsável (vencimentos, renovações, devoluções).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notificacao {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub mensagem: String,
    pub lida: bool,
    pub created_at: DateTime<Utc>,
}

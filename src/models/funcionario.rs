// src/models/funcionario.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Cadastro mínimo do departamento pessoal.
// É o principal "dono" de documentos (ASOs, certificados, fichas de EPI).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Funcionario {
    pub id: Uuid,
    pub filial_id: Uuid,
    pub nome_completo: String,
    pub matricula: String,
    pub cargo: Option<String>,
    pub data_admissao: Option<NaiveDate>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// src/models/documento.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Status do ciclo de vida
// ---
// VIGENTE -> A_VENCER -> VENCIDO, controlados pela rotina diária de vencimentos.
// RENOVADO é uma saída lateral terminal: uma vez marcado, nenhuma rotina o altera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "status_documento", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDocumento {
    Vigente,
    AVencer,
    Vencido,
    Renovado,
}

// ---
// 2. Dono do documento
// ---
// O sistema antigo usava uma referência genérica (type+id) para anexar um
// documento a qualquer modelo. Aqui a referência é etiquetada: o tipo fecha
// o conjunto de donos possíveis e a criação valida o alvo na filial ativa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "tipo_dono", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoDono {
    Funcionario,
    Ativo,
    Filial,
}

// ---
// 3. Documento
// ---
// `substitui_id` forma a cadeia de renovação (novo -> antigo). A cadeia nunca
// cicla: renovar um documento já RENOVADO é rejeitado na transação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Documento {
    pub id: Uuid,
    pub filial_id: Uuid,
    pub nome: String,
    pub arquivo: String,
    pub data_emissao: Option<NaiveDate>,
    // Em branco = documento sem vencimento (fica VIGENTE para sempre)
    pub data_vencimento: Option<NaiveDate>,
    pub status: StatusDocumento,
    pub responsavel_id: Option<Uuid>,
    pub dono_tipo: TipoDono,
    pub dono_id: Uuid,
    pub substitui_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha devolvida pelos UPDATEs da rotina de vencimentos, o suficiente
// para montar a notificação de cada transição.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentoTransicionado {
    pub id: Uuid,
    pub nome: String,
    pub data_vencimento: Option<NaiveDate>,
    pub responsavel_id: Option<Uuid>,
}

// Resumo de uma execução da rotina de vencimentos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoVencimentos {
    pub vencidos: u64,
    pub a_vencer: u64,
    pub revigorados: u64,
}

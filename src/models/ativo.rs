// src/models/ativo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Tipo e status do ativo
// ---
// Ferramentas e veículos compartilham o mesmo ciclo de retirada/devolução;
// os campos de quilometragem só se aplicam a VEICULO.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "tipo_ativo", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoAtivo {
    Ferramenta,
    Veiculo,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "status_ativo", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusAtivo {
    Disponivel,
    EmUso,
    EmManutencao,
    Descartado,
}

// ---
// 2. Ativo (ferramenta ou veículo patrimoniado)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ativo {
    pub id: Uuid,
    pub filial_id: Uuid,
    pub tipo: TipoAtivo,
    pub nome: String,
    pub codigo_identificacao: String,
    pub patrimonio: Option<String>,
    pub placa: Option<String>,
    // Hodômetro atual (apenas veículos); atualizado na devolução
    pub hodometro: Option<Decimal>,
    pub status: StatusAtivo,
    pub localizacao_padrao: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Movimentação (retirada -> devolução)
// ---
// ABERTA enquanto `data_devolucao` for nula. O índice único parcial em
// `movimentacoes (ativo_id) WHERE data_devolucao IS NULL` garante no
// máximo uma movimentação aberta por ativo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movimentacao {
    pub id: Uuid,
    pub filial_id: Uuid,
    pub ativo_id: Uuid,
    pub retirado_por: Uuid,
    pub data_retirada: DateTime<Utc>,
    pub data_devolucao_prevista: DateTime<Utc>,
    pub condicoes_retirada: String,
    pub assinatura_retirada: String,
    pub km_inicial: Option<Decimal>,
    pub data_devolucao: Option<DateTime<Utc>>,
    pub recebido_por: Option<Uuid>,
    pub condicoes_devolucao: Option<String>,
    pub assinatura_devolucao: Option<String>,
    pub km_final: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Movimentacao {
    pub fn esta_aberta(&self) -> bool {
        self.data_devolucao.is_none()
    }
}

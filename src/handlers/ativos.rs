// src/handlers/ativos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{Gestor, RequerPapel},
        tenancy::ContextoFilial,
    },
    models::ativo::{Ativo, StatusAtivo, TipoAtivo},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarAtivoPayload {
    #[schema(example = "VEICULO")]
    pub tipo: TipoAtivo,

    #[validate(length(min = 1, message = "O nome do ativo é obrigatório."))]
    #[schema(example = "Caminhonete S10")]
    pub nome: String,

    #[validate(length(min = 1, message = "O código de identificação é obrigatório."))]
    #[schema(example = "VE-007")]
    pub codigo_identificacao: String,

    pub patrimonio: Option<String>,

    // Apenas veículos
    #[schema(example = "ABC1D23")]
    pub placa: Option<String>,
    pub hodometro: Option<Decimal>,

    pub localizacao_padrao: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListarAtivosQuery {
    pub tipo: Option<TipoAtivo>,
    pub status: Option<StatusAtivo>,
}

// POST /api/ativos
#[utoipa::path(
    post,
    path = "/api/ativos",
    tag = "Ativos",
    request_body = CriarAtivoPayload,
    responses(
        (status = 201, description = "Ativo cadastrado como DISPONIVEL", body = Ativo),
        (status = 409, description = "Código de identificação já usado na filial")
    ),
    params(
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_ativo(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    _guard: RequerPapel<Gestor>,
    Json(payload): Json<CriarAtivoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ativo = app_state
        .ativo_service
        .criar(
            contexto.escopo,
            payload.tipo,
            &payload.nome,
            &payload.codigo_identificacao,
            payload.patrimonio.as_deref(),
            payload.placa.as_deref(),
            payload.hodometro,
            payload.localizacao_padrao.as_deref(),
            payload.observacoes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ativo)))
}

// GET /api/ativos
#[utoipa::path(
    get,
    path = "/api/ativos",
    tag = "Ativos",
    responses(
        (status = 200, description = "Ativos da filial ativa", body = [Ativo])
    ),
    params(
        ListarAtivosQuery,
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_ativos(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Query(query): Query<ListarAtivosQuery>,
) -> Result<Json<Vec<Ativo>>, AppError> {
    let ativos = app_state
        .ativo_service
        .listar(contexto.escopo, query.tipo, query.status)
        .await?;

    Ok(Json(ativos))
}

// GET /api/ativos/{id}
#[utoipa::path(
    get,
    path = "/api/ativos/{id}",
    tag = "Ativos",
    responses(
        (status = 200, description = "Ativo encontrado", body = Ativo),
        (status = 404, description = "Não encontrado na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Ativo"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_ativo(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<Json<Ativo>, AppError> {
    let ativo = app_state.ativo_service.buscar(contexto.escopo, id).await?;
    Ok(Json(ativo))
}

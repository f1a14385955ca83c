// src/handlers/filiais.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::UsuarioAutenticado,
        rbac::{Gestor, RequerPapel},
        tenancy::ContextoFilial,
    },
    models::filial::{Filial, FilialMembro, PapelMembro},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarFilialPayload {
    #[validate(length(min = 1, message = "O nome da filial é obrigatório."))]
    #[schema(example = "Filial Centro")]
    pub nome: String,

    pub cnpj: Option<String>,
    pub cidade: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdicionarMembroPayload {
    pub usuario_id: Uuid,

    #[schema(example = "MEMBRO")]
    pub papel: PapelMembro,
}

// POST /api/filiais
#[utoipa::path(
    post,
    path = "/api/filiais",
    tag = "Filiais",
    request_body = CriarFilialPayload,
    responses(
        (status = 201, description = "Filial criada; o criador entra como GESTOR", body = Filial)
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_filial(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    Json(payload): Json<CriarFilialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let filial = app_state
        .filial_service
        .criar_filial_com_gestor(
            &payload.nome,
            payload.cnpj.as_deref(),
            payload.cidade.as_deref(),
            usuario.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(filial)))
}

// GET /api/filiais
#[utoipa::path(
    get,
    path = "/api/filiais",
    tag = "Filiais",
    responses(
        (status = 200, description = "Filiais das quais o usuário é membro", body = [Filial])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_minhas_filiais(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
) -> Result<Json<Vec<Filial>>, AppError> {
    let filiais = app_state
        .filial_service
        .listar_filiais_do_usuario(usuario.id)
        .await?;

    Ok(Json(filiais))
}

// POST /api/filiais/{id}/membros
#[utoipa::path(
    post,
    path = "/api/filiais/{id}/membros",
    tag = "Filiais",
    request_body = AdicionarMembroPayload,
    responses(
        (status = 201, description = "Membro vinculado à filial", body = FilialMembro),
        (status = 409, description = "Usuário já é membro")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Filial"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn adicionar_membro(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    _guard: RequerPapel<Gestor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdicionarMembroPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Gestão de membros só dentro da filial ativa
    if !contexto.escopo.abrange(id) {
        return Err(AppError::AcessoNegado);
    }

    let membro = app_state
        .filial_service
        .adicionar_membro(id, payload.usuario_id, payload.papel)
        .await?;

    Ok((StatusCode::CREATED, Json(membro)))
}

// GET /api/filiais/{id}/membros
#[utoipa::path(
    get,
    path = "/api/filiais/{id}/membros",
    tag = "Filiais",
    responses(
        (status = 200, description = "Membros da filial", body = [FilialMembro])
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Filial"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_membros(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    _guard: RequerPapel<Gestor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FilialMembro>>, AppError> {
    if !contexto.escopo.abrange(id) {
        return Err(AppError::AcessoNegado);
    }

    let membros = app_state.filial_service.listar_membros(id).await?;
    Ok(Json(membros))
}

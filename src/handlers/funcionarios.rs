// src/handlers/funcionarios.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{Gestor, RequerPapel},
        tenancy::ContextoFilial,
    },
    models::funcionario::Funcionario,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarFuncionarioPayload {
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    #[validate(length(min = 1, message = "A matrícula é obrigatória."))]
    #[schema(example = "F-0042")]
    pub matricula: String,

    #[schema(example = "Eletricista")]
    pub cargo: Option<String>,

    pub data_admissao: Option<NaiveDate>,
}

// POST /api/funcionarios
#[utoipa::path(
    post,
    path = "/api/funcionarios",
    tag = "Funcionarios",
    request_body = CriarFuncionarioPayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = Funcionario),
        (status = 409, description = "Matrícula já usada na filial")
    ),
    params(
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_funcionario(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    _guard: RequerPapel<Gestor>,
    Json(payload): Json<CriarFuncionarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let funcionario = app_state
        .funcionario_service
        .criar(
            contexto.escopo,
            &payload.nome_completo,
            &payload.matricula,
            payload.cargo.as_deref(),
            payload.data_admissao,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(funcionario)))
}

// GET /api/funcionarios
#[utoipa::path(
    get,
    path = "/api/funcionarios",
    tag = "Funcionarios",
    responses(
        (status = 200, description = "Funcionários da filial ativa", body = [Funcionario])
    ),
    params(
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_funcionarios(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
) -> Result<Json<Vec<Funcionario>>, AppError> {
    let funcionarios = app_state.funcionario_service.listar(contexto.escopo).await?;
    Ok(Json(funcionarios))
}

// GET /api/funcionarios/{id}
#[utoipa::path(
    get,
    path = "/api/funcionarios/{id}",
    tag = "Funcionarios",
    responses(
        (status = 200, description = "Funcionário encontrado", body = Funcionario),
        (status = 404, description = "Não encontrado na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Funcionário"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_funcionario(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<Json<Funcionario>, AppError> {
    let funcionario = app_state
        .funcionario_service
        .buscar(contexto.escopo, id)
        .await?;
    Ok(Json(funcionario))
}

// DELETE /api/funcionarios/{id}
// Desativação lógica: o histórico de documentos do funcionário permanece.
#[utoipa::path(
    delete,
    path = "/api/funcionarios/{id}",
    tag = "Funcionarios",
    responses(
        (status = 204, description = "Funcionário desativado"),
        (status = 404, description = "Não encontrado na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Funcionário"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn desativar_funcionario(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    _guard: RequerPapel<Gestor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .funcionario_service
        .desativar(contexto.escopo, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

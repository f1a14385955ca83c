// src/handlers/movimentacoes.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::UsuarioAutenticado, tenancy::ContextoFilial},
    models::ativo::Movimentacao,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetirarAtivoPayload {
    pub ativo_id: Uuid,

    pub data_devolucao_prevista: DateTime<Utc>,

    #[validate(length(min = 1, message = "Descreva as condições do ativo na retirada."))]
    #[schema(example = "Sem avarias, tanque cheio")]
    pub condicoes_retirada: String,

    // Assinatura capturada no ato, em base64 (imagem)
    #[validate(length(min = 1, message = "A assinatura de retirada é obrigatória."))]
    pub assinatura_base64: String,

    // Apenas veículos; omitido usa o hodômetro atual do ativo
    pub km_inicial: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevolverAtivoPayload {
    #[schema(example = "Riscos na lateral direita")]
    pub condicoes_devolucao: Option<String>,

    pub assinatura_base64: Option<String>,

    // Apenas veículos; atualiza o hodômetro do ativo
    pub km_final: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListarMovimentacoesQuery {
    #[serde(default)]
    pub apenas_abertas: bool,
    pub ativo_id: Option<Uuid>,
}

// POST /api/movimentacoes/retirada
#[utoipa::path(
    post,
    path = "/api/movimentacoes/retirada",
    tag = "Movimentacoes",
    request_body = RetirarAtivoPayload,
    responses(
        (status = 201, description = "Movimentação aberta; ativo passa a EM_USO", body = Movimentacao),
        (status = 409, description = "Ativo indisponível ou já retirado")
    ),
    params(
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn retirar_ativo(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    contexto: ContextoFilial,
    Json(payload): Json<RetirarAtivoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movimentacao = app_state
        .movimentacao_service
        .retirar(
            contexto.escopo,
            payload.ativo_id,
            usuario.id,
            payload.data_devolucao_prevista,
            &payload.condicoes_retirada,
            &payload.assinatura_base64,
            payload.km_inicial,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movimentacao)))
}

// POST /api/movimentacoes/{id}/devolucao
#[utoipa::path(
    post,
    path = "/api/movimentacoes/{id}/devolucao",
    tag = "Movimentacoes",
    request_body = DevolverAtivoPayload,
    responses(
        (status = 200, description = "Movimentação encerrada; ativo volta a DISPONIVEL", body = Movimentacao),
        (status = 409, description = "Movimentação já encerrada"),
        (status = 400, description = "Quilometragem de devolução menor que a de retirada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Movimentação"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn devolver_ativo(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
    Json(payload): Json<DevolverAtivoPayload>,
) -> Result<Json<Movimentacao>, AppError> {
    let movimentacao = app_state
        .movimentacao_service
        .devolver(
            contexto.escopo,
            id,
            usuario.id,
            payload.condicoes_devolucao.as_deref(),
            payload.assinatura_base64.as_deref(),
            payload.km_final,
        )
        .await?;

    Ok(Json(movimentacao))
}

// GET /api/movimentacoes
#[utoipa::path(
    get,
    path = "/api/movimentacoes",
    tag = "Movimentacoes",
    responses(
        (status = 200, description = "Movimentações da filial ativa, mais recentes primeiro", body = [Movimentacao])
    ),
    params(
        ListarMovimentacoesQuery,
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_movimentacoes(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Query(query): Query<ListarMovimentacoesQuery>,
) -> Result<Json<Vec<Movimentacao>>, AppError> {
    let movimentacoes = app_state
        .movimentacao_service
        .listar(contexto.escopo, query.apenas_abertas, query.ativo_id)
        .await?;

    Ok(Json(movimentacoes))
}

// GET /api/movimentacoes/{id}
#[utoipa::path(
    get,
    path = "/api/movimentacoes/{id}",
    tag = "Movimentacoes",
    responses(
        (status = 200, description = "Movimentação encontrada", body = Movimentacao),
        (status = 404, description = "Não encontrada na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Movimentação"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_movimentacao(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<Json<Movimentacao>, AppError> {
    let movimentacao = app_state
        .movimentacao_service
        .buscar(contexto.escopo, id)
        .await?;
    Ok(Json(movimentacao))
}

// GET /api/movimentacoes/{id}/termo
// Termo de responsabilidade em PDF, com QR code do ativo para conferência.
#[utoipa::path(
    get,
    path = "/api/movimentacoes/{id}/termo",
    tag = "Movimentacoes",
    responses(
        (status = 200, description = "PDF do termo de responsabilidade", content_type = "application/pdf"),
        (status = 404, description = "Movimentação não encontrada na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Movimentação"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn baixar_termo(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (movimentacao, ativo) = app_state
        .movimentacao_service
        .buscar_com_ativo(contexto.escopo, id)
        .await?;

    let filial = app_state.filial_service.buscar_filial(ativo.filial_id).await?;

    // Renderização é CPU-bound; sai do executor async
    let termo_service = app_state.termo_service.clone();
    let pdf = tokio::task::spawn_blocking(move || {
        termo_service.gerar(&movimentacao, &ativo, &filial.nome)
    })
    .await
    .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"termo-{}.pdf\"", id),
        ),
    ];

    Ok((headers, pdf))
}

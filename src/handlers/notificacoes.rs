// src/handlers/notificacoes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::UsuarioAutenticado,
    models::notificacao::Notificacao,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListarNotificacoesQuery {
    #[serde(default)]
    pub apenas_nao_lidas: bool,
}

// GET /api/notificacoes
#[utoipa::path(
    get,
    path = "/api/notificacoes",
    tag = "Notificacoes",
    responses(
        (status = 200, description = "Notificações do usuário autenticado", body = [Notificacao])
    ),
    params(ListarNotificacoesQuery),
    security(("api_jwt" = []))
)]
pub async fn listar_notificacoes(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    Query(query): Query<ListarNotificacoesQuery>,
) -> Result<Json<Vec<Notificacao>>, AppError> {
    let notificacoes = app_state
        .notificacao_service
        .listar(usuario.id, query.apenas_nao_lidas)
        .await?;

    Ok(Json(notificacoes))
}

// POST /api/notificacoes/{id}/lida
#[utoipa::path(
    post,
    path = "/api/notificacoes/{id}/lida",
    tag = "Notificacoes",
    responses(
        (status = 204, description = "Notificação marcada como lida"),
        (status = 404, description = "Notificação não encontrada para este usuário")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Notificação")
    ),
    security(("api_jwt" = []))
)]
pub async fn marcar_lida(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .notificacao_service
        .marcar_lida(id, usuario.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

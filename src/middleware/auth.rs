// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Usuario};

/// Valida o Bearer token e injeta o `Usuario` nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let usuario = app_state
        .auth_service
        .validate_token(bearer.token())
        .await?;

    request.extensions_mut().insert(usuario);
    Ok(next.run(request).await)
}

/// Extrator para obter o usuário autenticado diretamente nos handlers.
pub struct UsuarioAutenticado(pub Usuario);

impl<S> FromRequestParts<S> for UsuarioAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .map(UsuarioAutenticado)
            .ok_or(AppError::InvalidToken)
    }
}

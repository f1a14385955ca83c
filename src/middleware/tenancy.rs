// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    config::AppState,
    models::{auth::Usuario, filial::PapelMembro},
};

// O nome do nosso cabeçalho HTTP customizado
const FILIAL_ID_HEADER: &str = "x-filial-id";

/// Escopo resolvido da requisição: em qual filial (ou todas) o usuário está
/// operando, e com qual papel.
#[derive(Debug, Clone, Copy)]
pub struct ContextoFilial {
    pub escopo: EscopoFilial,
    pub papel: PapelMembro,
}

impl ContextoFilial {
    /// Gestor da filial ativa ou superusuário em escopo global.
    pub fn pode_gerenciar(&self) -> bool {
        self.papel == PapelMembro::Gestor
    }
}

/// Resolve o escopo de filial da requisição. Roda DEPOIS do `auth_guard`,
/// portanto o `Usuario` já está nos extensions.
///
/// As regras são fechadas e barulhentas:
/// - cabeçalho presente: o usuário precisa ser membro da filial (ou
///   superusuário); caso contrário, 403.
/// - cabeçalho ausente: superusuário opera em TODAS as filiais; usuário
///   comum recebe 403 pedindo a seleção explícita.
pub async fn filial_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let usuario = request
        .extensions()
        .get::<Usuario>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    let header = request
        .headers()
        .get(FILIAL_ID_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::CabecalhoFilialInvalido)
                .and_then(|s| Uuid::parse_str(s).map_err(|_| AppError::CabecalhoFilialInvalido))
        })
        .transpose()?;

    let contexto = match header {
        Some(filial_id) => {
            let papel = if usuario.is_superuser {
                PapelMembro::Gestor
            } else {
                app_state
                    .filial_repo
                    .buscar_membro(usuario.id, filial_id)
                    .await?
                    .ok_or(AppError::AcessoNegado)?
                    .papel
            };

            ContextoFilial {
                escopo: EscopoFilial::Filial(filial_id),
                papel,
            }
        }
        None if usuario.is_superuser => ContextoFilial {
            escopo: EscopoFilial::TodasAsFiliais,
            papel: PapelMembro::Gestor,
        },
        None => return Err(AppError::FilialNaoSelecionada),
    };

    request.extensions_mut().insert(contexto);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for ContextoFilial
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ContextoFilial>()
            .copied()
            .ok_or(AppError::FilialNaoSelecionada)
    }
}

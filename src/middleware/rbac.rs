// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::tenancy::ContextoFilial,
    models::filial::PapelMembro,
};

/// 1. O trait que define o papel mínimo exigido
pub trait PapelExigido: Send + Sync + 'static {
    fn papel() -> PapelMembro;
}

/// 2. O extrator (guardião): basta declará-lo na assinatura do handler
pub struct RequerPapel<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequerPapel<T>
where
    T: PapelExigido,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let contexto = parts
            .extensions
            .get::<ContextoFilial>()
            .ok_or(AppError::FilialNaoSelecionada)?;

        // MEMBRO cobre qualquer membro; GESTOR exige papel de gestão
        // (superusuários entram no contexto já como GESTOR)
        let autorizado = match T::papel() {
            PapelMembro::Membro => true,
            PapelMembro::Gestor => contexto.pode_gerenciar(),
        };

        if !autorizado {
            return Err(AppError::AcessoNegado);
        }

        Ok(RequerPapel(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct Gestor;
impl PapelExigido for Gestor {
    fn papel() -> PapelMembro {
        PapelMembro::Gestor
    }
}

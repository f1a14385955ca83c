// src/handlers/documentos.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::UsuarioAutenticado, tenancy::ContextoFilial},
    models::documento::{Documento, ResumoVencimentos, StatusDocumento, TipoDono},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarDocumentoPayload {
    #[validate(length(min = 1, message = "O nome do documento é obrigatório."))]
    #[schema(example = "ASO Periódico 2026")]
    pub nome: String,

    #[validate(length(min = 1, message = "O nome do arquivo é obrigatório."))]
    #[schema(example = "aso-2026.pdf")]
    pub nome_arquivo: String,

    // Conteúdo do ficheiro em base64 (padrão, com padding)
    #[validate(length(min = 1, message = "O conteúdo do arquivo é obrigatório."))]
    pub conteudo_base64: String,

    pub data_emissao: Option<NaiveDate>,

    // Em branco: documento sem vencimento
    pub data_vencimento: Option<NaiveDate>,

    #[schema(example = "FUNCIONARIO")]
    pub dono_tipo: TipoDono,

    pub dono_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenovarDocumentoPayload {
    #[validate(length(min = 1, message = "O nome do documento é obrigatório."))]
    pub nome: String,

    #[validate(length(min = 1, message = "O nome do arquivo é obrigatório."))]
    pub nome_arquivo: String,

    #[validate(length(min = 1, message = "O conteúdo do arquivo é obrigatório."))]
    pub conteudo_base64: String,

    pub data_emissao: Option<NaiveDate>,
    pub data_vencimento: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificarVencimentosPayload {
    // Janela de aviso só para esta execução; omitido usa a configuração
    #[schema(example = 15)]
    pub dias_aviso: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListarDocumentosQuery {
    pub status: Option<StatusDocumento>,
    pub dono_tipo: Option<TipoDono>,
    pub dono_id: Option<Uuid>,
}

// POST /api/documentos
#[utoipa::path(
    post,
    path = "/api/documentos",
    tag = "Documentos",
    request_body = CriarDocumentoPayload,
    responses(
        (status = 201, description = "Documento criado com o status derivado do vencimento", body = Documento),
        (status = 400, description = "Dono inexistente na filial ativa ou base64 inválido")
    ),
    params(
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_documento(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    contexto: ContextoFilial,
    Json(payload): Json<CriarDocumentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let documento = app_state
        .documento_service
        .criar(
            contexto.escopo,
            usuario.id,
            &payload.nome,
            &payload.nome_arquivo,
            &payload.conteudo_base64,
            payload.data_emissao,
            payload.data_vencimento,
            payload.dono_tipo,
            payload.dono_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(documento)))
}

// GET /api/documentos
#[utoipa::path(
    get,
    path = "/api/documentos",
    tag = "Documentos",
    responses(
        (status = 200, description = "Documentos da filial ativa, vencimento mais próximo primeiro", body = [Documento])
    ),
    params(
        ListarDocumentosQuery,
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_documentos(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Query(query): Query<ListarDocumentosQuery>,
) -> Result<Json<Vec<Documento>>, AppError> {
    let documentos = app_state
        .documento_service
        .listar(contexto.escopo, query.status, query.dono_tipo, query.dono_id)
        .await?;

    Ok(Json(documentos))
}

// GET /api/documentos/{id}
#[utoipa::path(
    get,
    path = "/api/documentos/{id}",
    tag = "Documentos",
    responses(
        (status = 200, description = "Documento encontrado", body = Documento),
        (status = 404, description = "Não encontrado na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Documento"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_documento(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<Json<Documento>, AppError> {
    let documento = app_state
        .documento_service
        .buscar(contexto.escopo, id)
        .await?;
    Ok(Json(documento))
}

// GET /api/documentos/{id}/download
// O ficheiro nunca é servido por caminho direto: a checagem de escopo
// acontece aqui, antes da leitura.
#[utoipa::path(
    get,
    path = "/api/documentos/{id}/download",
    tag = "Documentos",
    responses(
        (status = 200, description = "Conteúdo do ficheiro", content_type = "application/octet-stream"),
        (status = 404, description = "Documento ou ficheiro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Documento"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn baixar_documento(
    State(app_state): State<AppState>,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (documento, mut arquivo) = app_state
        .documento_service
        .abrir_arquivo(contexto.escopo, id)
        .await?;

    let mut conteudo = Vec::new();
    arquivo.read_to_end(&mut conteudo).await?;

    let nome_download = documento
        .arquivo
        .rsplit('/')
        .next()
        .unwrap_or("documento")
        .to_string();

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", nome_download),
        ),
    ];

    Ok((headers, conteudo))
}

// DELETE /api/documentos/{id}
#[utoipa::path(
    delete,
    path = "/api/documentos/{id}",
    tag = "Documentos",
    responses(
        (status = 204, description = "Documento e ficheiro removidos"),
        (status = 403, description = "Apenas o responsável ou um gestor pode excluir"),
        (status = 404, description = "Não encontrado na filial ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Documento"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir_documento(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .documento_service
        .excluir(contexto.escopo, id, usuario.id, contexto.pode_gerenciar())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/documentos/{id}/renovar
#[utoipa::path(
    post,
    path = "/api/documentos/{id}/renovar",
    tag = "Documentos",
    request_body = RenovarDocumentoPayload,
    responses(
        (status = 201, description = "Substituto criado; o antigo vira RENOVADO", body = Documento),
        (status = 409, description = "Documento já foi renovado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Documento a renovar"),
        ("x-filial-id" = Uuid, Header, description = "Filial ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn renovar_documento(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    contexto: ContextoFilial,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenovarDocumentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let novo = app_state
        .documento_service
        .renovar(
            contexto.escopo,
            id,
            usuario.id,
            &payload.nome,
            &payload.nome_arquivo,
            &payload.conteudo_base64,
            payload.data_emissao,
            payload.data_vencimento,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(novo)))
}

// POST /api/documentos/verificar-vencimentos
// Disparo manual da rotina diária (restrito a superusuários). A rotina é
// idempotente: rodar duas vezes no mesmo dia não muda nada na segunda.
#[utoipa::path(
    post,
    path = "/api/documentos/verificar-vencimentos",
    tag = "Documentos",
    request_body = VerificarVencimentosPayload,
    responses(
        (status = 200, description = "Resumo das transições aplicadas", body = ResumoVencimentos),
        (status = 403, description = "Apenas superusuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn verificar_vencimentos(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    Json(payload): Json<VerificarVencimentosPayload>,
) -> Result<Json<ResumoVencimentos>, AppError> {
    if !usuario.is_superuser {
        return Err(AppError::AcessoNegado);
    }

    let resumo = app_state
        .documento_service
        .recomputar_vencimentos(Utc::now().date_naive(), payload.dias_aviso)
        .await?;

    Ok(Json(resumo))
}

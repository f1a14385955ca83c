use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Cada regra de negócio violada tem a sua variante; o IntoResponse decide o status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Tenancy ---
    #[error("Nenhuma filial ativa para este pedido")]
    FilialNaoSelecionada,

    #[error("Cabeçalho X-Filial-Id inválido (não é um UUID)")]
    CabecalhoFilialInvalido,

    #[error("Acesso negado")]
    AcessoNegado,

    #[error("Filial não encontrada")]
    FilialNaoEncontrada,

    #[error("Usuário já é membro desta filial")]
    MembroJaExiste,

    // --- Funcionários ---
    #[error("Funcionário não encontrado")]
    FuncionarioNaoEncontrado,

    #[error("Matrícula '{0}' já cadastrada nesta filial")]
    MatriculaJaExiste(String),

    // --- Documentos ---
    #[error("Documento não encontrado")]
    DocumentoNaoEncontrado,

    #[error("Dono do documento não encontrado na filial ativa")]
    DonoInvalido,

    #[error("Documento já foi renovado")]
    DocumentoJaRenovado,

    // --- Ativos e movimentações ---
    #[error("Ativo não encontrado")]
    AtivoNaoEncontrado,

    #[error("Código de identificação '{0}' já cadastrado nesta filial")]
    CodigoJaExiste(String),

    #[error("Ativo não está disponível para retirada")]
    AtivoIndisponivel,

    #[error("Ativo já possui uma movimentação em aberto")]
    AtivoJaRetirado,

    #[error("Movimentação não encontrada")]
    MovimentacaoNaoEncontrada,

    #[error("Movimentação já foi encerrada")]
    MovimentacaoJaEncerrada,

    #[error("Quilometragem de devolução menor que a de retirada")]
    KmFinalMenorQueInicial,

    #[error("Data de devolução anterior à data de retirada")]
    DevolucaoAntesDaRetirada,

    // --- Arquivos ---
    #[error("Caminho de arquivo inválido")]
    CaminhoInvalido,

    #[error("Arquivo não encontrado")]
    ArquivoNaoEncontrado,

    #[error("Conteúdo base64 inválido")]
    Base64Invalido,

    // --- Notificações ---
    #[error("Notificação não encontrada")]
    NotificacaoNaoEncontrada,

    #[error("Violação de restrição única: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Falha ao gerar PDF: {0}")]
    PdfError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }

            // Sem filial resolvida o pedido morre aqui, antes de qualquer consulta.
            AppError::FilialNaoSelecionada => (
                StatusCode::FORBIDDEN,
                "Selecione uma filial (cabeçalho X-Filial-Id) para acessar este recurso.".to_string(),
            ),
            AppError::AcessoNegado => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para realizar esta ação.".to_string(),
            ),

            ref e @ (AppError::FilialNaoEncontrada
            | AppError::FuncionarioNaoEncontrado
            | AppError::DocumentoNaoEncontrado
            | AppError::AtivoNaoEncontrado
            | AppError::MovimentacaoNaoEncontrada
            | AppError::NotificacaoNaoEncontrada
            | AppError::ArquivoNaoEncontrado) => (StatusCode::NOT_FOUND, e.to_string()),

            ref e @ (AppError::MembroJaExiste
            | AppError::MatriculaJaExiste(_)
            | AppError::CodigoJaExiste(_)
            | AppError::DocumentoJaRenovado
            | AppError::AtivoIndisponivel
            | AppError::AtivoJaRetirado
            | AppError::MovimentacaoJaEncerrada
            | AppError::UniqueConstraintViolation(_)) => (StatusCode::CONFLICT, e.to_string()),

            ref e @ (AppError::DonoInvalido
            | AppError::KmFinalMenorQueInicial
            | AppError::DevolucaoAntesDaRetirada
            | AppError::CaminhoInvalido
            | AppError::Base64Invalido
            | AppError::CabecalhoFilialInvalido) => (StatusCode::BAD_REQUEST, e.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError, etc.) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Filiais ---
        handlers::filiais::criar_filial,
        handlers::filiais::listar_minhas_filiais,
        handlers::filiais::adicionar_membro,
        handlers::filiais::listar_membros,

        // --- Funcionários ---
        handlers::funcionarios::criar_funcionario,
        handlers::funcionarios::listar_funcionarios,
        handlers::funcionarios::buscar_funcionario,
        handlers::funcionarios::desativar_funcionario,

        // --- Documentos ---
        handlers::documentos::criar_documento,
        handlers::documentos::listar_documentos,
        handlers::documentos::buscar_documento,
        handlers::documentos::baixar_documento,
        handlers::documentos::excluir_documento,
        handlers::documentos::renovar_documento,
        handlers::documentos::verificar_vencimentos,

        // --- Ativos ---
        handlers::ativos::criar_ativo,
        handlers::ativos::listar_ativos,
        handlers::ativos::buscar_ativo,

        // --- Movimentações ---
        handlers::movimentacoes::retirar_ativo,
        handlers::movimentacoes::devolver_ativo,
        handlers::movimentacoes::listar_movimentacoes,
        handlers::movimentacoes::buscar_movimentacao,
        handlers::movimentacoes::baixar_termo,

        // --- Notificações ---
        handlers::notificacoes::listar_notificacoes,
        handlers::notificacoes::marcar_lida,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Filiais ---
            models::filial::Filial,
            models::filial::PapelMembro,
            models::filial::FilialMembro,
            handlers::filiais::CriarFilialPayload,
            handlers::filiais::AdicionarMembroPayload,

            // --- Funcionários ---
            models::funcionario::Funcionario,
            handlers::funcionarios::CriarFuncionarioPayload,

            // --- Documentos ---
            models::documento::StatusDocumento,
            models::documento::TipoDono,
            models::documento::Documento,
            models::documento::ResumoVencimentos,
            handlers::documentos::CriarDocumentoPayload,
            handlers::documentos::RenovarDocumentoPayload,
            handlers::documentos::VerificarVencimentosPayload,

            // --- Ativos ---
            models::ativo::TipoAtivo,
            models::ativo::StatusAtivo,
            models::ativo::Ativo,
            models::ativo::Movimentacao,
            handlers::ativos::CriarAtivoPayload,
            handlers::movimentacoes::RetirarAtivoPayload,
            handlers::movimentacoes::DevolverAtivoPayload,

            // --- Notificações ---
            models::notificacao::Notificacao,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Filiais", description = "Gestão de Filiais e Membros"),
        (name = "Funcionarios", description = "Cadastro de Funcionários"),
        (name = "Documentos", description = "Documentos, Vencimentos e Renovações"),
        (name = "Ativos", description = "Ferramentas e Veículos"),
        (name = "Movimentacoes", description = "Retirada e Devolução de Ativos"),
        (name = "Notificacoes", description = "Avisos do Usuário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

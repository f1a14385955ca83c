//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod jobs;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, tenancy::filial_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotina diária de vencimentos (com advisory lock entre instâncias)
    jobs::vencimentos::iniciar(app_state.clone());

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas que só precisam do usuário autenticado (sem filial ativa)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let notificacao_routes = Router::new()
        .route("/", get(handlers::notificacoes::listar_notificacoes))
        .route("/{id}/lida", post(handlers::notificacoes::marcar_lida))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Criar/listar filiais não exige filial ativa; gerir membros exige.
    let filial_routes = Router::new()
        .route(
            "/",
            post(handlers::filiais::criar_filial).get(handlers::filiais::listar_minhas_filiais),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let membro_routes = Router::new()
        .route(
            "/{id}/membros",
            post(handlers::filiais::adicionar_membro).get(handlers::filiais::listar_membros),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            filial_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let funcionario_routes = Router::new()
        .route(
            "/",
            post(handlers::funcionarios::criar_funcionario)
                .get(handlers::funcionarios::listar_funcionarios),
        )
        .route(
            "/{id}",
            get(handlers::funcionarios::buscar_funcionario)
                .delete(handlers::funcionarios::desativar_funcionario),
        );

    let documento_routes = Router::new()
        .route(
            "/",
            post(handlers::documentos::criar_documento)
                .get(handlers::documentos::listar_documentos),
        )
        .route(
            "/verificar-vencimentos",
            post(handlers::documentos::verificar_vencimentos),
        )
        .route(
            "/{id}",
            get(handlers::documentos::buscar_documento)
                .delete(handlers::documentos::excluir_documento),
        )
        .route("/{id}/download", get(handlers::documentos::baixar_documento))
        .route("/{id}/renovar", post(handlers::documentos::renovar_documento));

    let ativo_routes = Router::new()
        .route(
            "/",
            post(handlers::ativos::criar_ativo).get(handlers::ativos::listar_ativos),
        )
        .route("/{id}", get(handlers::ativos::buscar_ativo));

    let movimentacao_routes = Router::new()
        .route("/", get(handlers::movimentacoes::listar_movimentacoes))
        .route("/retirada", post(handlers::movimentacoes::retirar_ativo))
        .route("/{id}", get(handlers::movimentacoes::buscar_movimentacao))
        .route(
            "/{id}/devolucao",
            post(handlers::movimentacoes::devolver_ativo),
        )
        .route("/{id}/termo", get(handlers::movimentacoes::baixar_termo));

    // Tudo que lê ou escreve dados de filial passa pelo par auth + filial.
    // A ordem das layers importa: a de baixo roda primeiro.
    let escopado = Router::new()
        .nest("/api/funcionarios", funcionario_routes)
        .nest("/api/documentos", documento_routes)
        .nest("/api/ativos", ativo_routes)
        .nest("/api/movimentacoes", movimentacao_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            filial_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/notificacoes", notificacao_routes)
        .nest("/api/filiais", filial_routes)
        .nest("/api/filiais", membro_routes)
        .merge(escopado)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

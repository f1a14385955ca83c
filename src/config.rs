// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AtivoRepository, DocumentoRepository, FilialRepository, FuncionarioRepository,
        MovimentacaoRepository, NotificacaoRepository, UserRepository,
    },
    services::{
        ArquivoService, AtivoService, AuthService, CanalBanco, CanalNotificacao,
        DocumentoService, FilialService, FuncionarioService, MovimentacaoService,
        NotificacaoService, TermoService,
    },
};

// Janela de aviso padrão quando DIAS_AVISO_VENCIMENTO não está definida
const DIAS_AVISO_PADRAO: u32 = 30;

// Rotina de vencimentos roda uma vez por dia por padrão
const INTERVALO_VERIFICACAO_PADRAO: u64 = 86_400;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub intervalo_verificacao: Duration,

    // Repositório exposto para o middleware de tenancy resolver o papel
    pub filial_repo: FilialRepository,

    pub auth_service: AuthService,
    pub filial_service: FilialService,
    pub funcionario_service: FuncionarioService,
    pub documento_service: DocumentoService,
    pub ativo_service: AtivoService,
    pub movimentacao_service: MovimentacaoService,
    pub notificacao_service: NotificacaoService,
    pub termo_service: TermoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let dias_aviso = env::var("DIAS_AVISO_VENCIMENTO")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DIAS_AVISO_PADRAO);

        let arquivos_dir = env::var("ARQUIVOS_DIR").unwrap_or_else(|_| "./arquivos".to_string());

        let intervalo_verificacao = env::var("INTERVALO_VERIFICACAO_SEGUNDOS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(INTERVALO_VERIFICACAO_PADRAO));

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let filial_repo = FilialRepository::new(db_pool.clone());
        let funcionario_repo = FuncionarioRepository::new(db_pool.clone());
        let documento_repo = DocumentoRepository::new(db_pool.clone());
        let ativo_repo = AtivoRepository::new(db_pool.clone());
        let movimentacao_repo = MovimentacaoRepository::new(db_pool.clone());
        let notificacao_repo = NotificacaoRepository::new(db_pool.clone());

        let arquivo_service = ArquivoService::new(PathBuf::from(arquivos_dir));

        let canais: Vec<Arc<dyn CanalNotificacao>> =
            vec![Arc::new(CanalBanco::new(notificacao_repo.clone()))];
        let notificacao_service = NotificacaoService::new(notificacao_repo, canais);

        let auth_service = AuthService::new(user_repo, jwt_secret.clone());
        let filial_service = FilialService::new(filial_repo.clone(), db_pool.clone());
        let funcionario_service =
            FuncionarioService::new(funcionario_repo.clone(), db_pool.clone());

        let documento_service = DocumentoService::new(
            documento_repo,
            funcionario_repo,
            ativo_repo.clone(),
            arquivo_service.clone(),
            notificacao_service.clone(),
            db_pool.clone(),
            dias_aviso,
        );

        let ativo_service = AtivoService::new(ativo_repo.clone(), db_pool.clone());

        let movimentacao_service = MovimentacaoService::new(
            movimentacao_repo,
            ativo_repo,
            arquivo_service,
            notificacao_service.clone(),
            db_pool.clone(),
        );

        let termo_service = TermoService::new();

        Ok(Self {
            db_pool,
            jwt_secret,
            intervalo_verificacao,
            filial_repo,
            auth_service,
            filial_service,
            funcionario_service,
            documento_service,
            ativo_service,
            movimentacao_service,
            notificacao_service,
            termo_service,
        })
    }
}

// src/services/ativo_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    db::AtivoRepository,
    models::ativo::{Ativo, StatusAtivo, TipoAtivo},
};

#[derive(Clone)]
pub struct AtivoService {
    ativo_repo: AtivoRepository,
    pool: PgPool,
}

impl AtivoService {
    pub fn new(ativo_repo: AtivoRepository, pool: PgPool) -> Self {
        Self { ativo_repo, pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn criar(
        &self,
        escopo: EscopoFilial,
        tipo: TipoAtivo,
        nome: &str,
        codigo_identificacao: &str,
        patrimonio: Option<&str>,
        placa: Option<&str>,
        hodometro: Option<Decimal>,
        localizacao_padrao: Option<&str>,
        observacoes: Option<&str>,
    ) -> Result<Ativo, AppError> {
        let filial_id = escopo.filial_exigida()?;

        // Placa e hodômetro só fazem sentido para veículos
        let (placa, hodometro) = match tipo {
            TipoAtivo::Veiculo => (placa, hodometro),
            TipoAtivo::Ferramenta => (None, None),
        };

        self.ativo_repo
            .criar(
                &self.pool,
                filial_id,
                tipo,
                nome,
                codigo_identificacao,
                patrimonio,
                placa,
                hodometro,
                localizacao_padrao,
                observacoes,
            )
            .await
    }

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        tipo: Option<TipoAtivo>,
        status: Option<StatusAtivo>,
    ) -> Result<Vec<Ativo>, AppError> {
        self.ativo_repo.listar(escopo, tipo, status).await
    }

    pub async fn buscar(&self, escopo: EscopoFilial, id: Uuid) -> Result<Ativo, AppError> {
        self.ativo_repo
            .buscar(escopo, id)
            .await?
            .ok_or(AppError::AtivoNaoEncontrado)
    }
}

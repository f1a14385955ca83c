// src/services/movimentacao_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    db::{AtivoRepository, MovimentacaoRepository},
    models::ativo::{Ativo, Movimentacao, StatusAtivo, TipoAtivo},
    services::{arquivo_service::ArquivoService, notificacao_service::NotificacaoService},
};

/// Checagens puras da devolução: a cronologia e a quilometragem precisam
/// fechar antes de qualquer escrita.
pub fn validar_devolucao(
    data_retirada: DateTime<Utc>,
    data_devolucao: DateTime<Utc>,
    km_inicial: Option<Decimal>,
    km_final: Option<Decimal>,
) -> Result<(), AppError> {
    if data_devolucao <= data_retirada {
        return Err(AppError::DevolucaoAntesDaRetirada);
    }

    if let (Some(inicial), Some(fim)) = (km_inicial, km_final) {
        if fim < inicial {
            return Err(AppError::KmFinalMenorQueInicial);
        }
    }

    Ok(())
}

#[derive(Clone)]
pub struct MovimentacaoService {
    movimentacao_repo: MovimentacaoRepository,
    ativo_repo: AtivoRepository,
    arquivos: ArquivoService,
    notificacoes: NotificacaoService,
    pool: PgPool,
}

impl MovimentacaoService {
    pub fn new(
        movimentacao_repo: MovimentacaoRepository,
        ativo_repo: AtivoRepository,
        arquivos: ArquivoService,
        notificacoes: NotificacaoService,
        pool: PgPool,
    ) -> Self {
        Self {
            movimentacao_repo,
            ativo_repo,
            arquivos,
            notificacoes,
            pool,
        }
    }

    // --- RETIRADA ---
    /// Abre a movimentação e marca o ativo como EM_USO numa transação só.
    /// A trava `FOR UPDATE` no ativo serializa retiradas concorrentes; o
    /// índice único parcial no banco é a rede de segurança final.
    #[allow(clippy::too_many_arguments)]
    pub async fn retirar(
        &self,
        escopo: EscopoFilial,
        ativo_id: Uuid,
        retirado_por: Uuid,
        data_devolucao_prevista: DateTime<Utc>,
        condicoes_retirada: &str,
        assinatura_base64: &str,
        km_inicial: Option<Decimal>,
    ) -> Result<Movimentacao, AppError> {
        let filial_id = escopo.filial_exigida()?;

        let mut tx = self.pool.begin().await?;

        let ativo = self
            .ativo_repo
            .buscar_para_atualizacao(&mut *tx, escopo, ativo_id)
            .await?
            .ok_or(AppError::AtivoNaoEncontrado)?;

        if ativo.status != StatusAtivo::Disponivel {
            return Err(AppError::AtivoIndisponivel);
        }

        // Para veículos, a quilometragem inicial cai para o hodômetro atual
        // quando o solicitante não informa
        let km_inicial = match ativo.tipo {
            TipoAtivo::Veiculo => km_inicial.or(ativo.hodometro),
            TipoAtivo::Ferramenta => None,
        };

        let assinatura = self
            .arquivos
            .salvar("assinaturas", ativo_id, "retirada.png", assinatura_base64)
            .await?;

        let movimentacao = self
            .movimentacao_repo
            .abrir(
                &mut *tx,
                filial_id,
                ativo_id,
                retirado_por,
                data_devolucao_prevista,
                condicoes_retirada,
                &assinatura,
                km_inicial,
            )
            .await?;

        self.ativo_repo
            .atualizar_situacao(&mut *tx, ativo_id, StatusAtivo::EmUso, None)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Ativo '{}' retirado por {} (movimentação {}).",
            ativo.codigo_identificacao,
            retirado_por,
            movimentacao.id
        );

        Ok(movimentacao)
    }

    // --- DEVOLUÇÃO ---
    /// Encerra a movimentação aberta e devolve o ativo a DISPONIVEL. Para
    /// veículos o hodômetro avança para o km final informado.
    #[allow(clippy::too_many_arguments)]
    pub async fn devolver(
        &self,
        escopo: EscopoFilial,
        movimentacao_id: Uuid,
        recebido_por: Uuid,
        condicoes_devolucao: Option<&str>,
        assinatura_base64: Option<&str>,
        km_final: Option<Decimal>,
    ) -> Result<Movimentacao, AppError> {
        let mut tx = self.pool.begin().await?;

        let aberta = self
            .movimentacao_repo
            .buscar_para_atualizacao(&mut *tx, escopo, movimentacao_id)
            .await?
            .ok_or(AppError::MovimentacaoNaoEncontrada)?;

        if !aberta.esta_aberta() {
            return Err(AppError::MovimentacaoJaEncerrada);
        }

        let data_devolucao = Utc::now();
        validar_devolucao(aberta.data_retirada, data_devolucao, aberta.km_inicial, km_final)?;

        let assinatura = match assinatura_base64 {
            Some(conteudo) => Some(
                self.arquivos
                    .salvar("assinaturas", aberta.ativo_id, "devolucao.png", conteudo)
                    .await?,
            ),
            None => None,
        };

        let encerrada = self
            .movimentacao_repo
            .encerrar(
                &mut *tx,
                movimentacao_id,
                data_devolucao,
                recebido_por,
                condicoes_devolucao,
                assinatura.as_deref(),
                km_final,
            )
            .await?
            // A trava FOR UPDATE já segurou a linha; zero linhas aqui só
            // aconteceria fora da transação
            .ok_or(AppError::MovimentacaoJaEncerrada)?;

        self.ativo_repo
            .atualizar_situacao(&mut *tx, aberta.ativo_id, StatusAtivo::Disponivel, km_final)
            .await?;

        tx.commit().await?;

        self.notificacoes
            .notificar(
                Some(aberta.retirado_por),
                "A devolução do ativo que você retirou foi registrada.",
            )
            .await;

        Ok(encerrada)
    }

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        apenas_abertas: bool,
        ativo_id: Option<Uuid>,
    ) -> Result<Vec<Movimentacao>, AppError> {
        self.movimentacao_repo.listar(escopo, apenas_abertas, ativo_id).await
    }

    pub async fn buscar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<Movimentacao, AppError> {
        self.movimentacao_repo
            .buscar(escopo, id)
            .await?
            .ok_or(AppError::MovimentacaoNaoEncontrada)
    }

    /// Movimentação junto com o ativo, para o termo de responsabilidade.
    pub async fn buscar_com_ativo(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<(Movimentacao, Ativo), AppError> {
        let movimentacao = self.buscar(escopo, id).await?;
        let ativo = self
            .ativo_repo
            .buscar(escopo, movimentacao.ativo_id)
            .await?
            .ok_or(AppError::AtivoNaoEncontrado)?;
        Ok((movimentacao, ativo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn devolucao_precisa_vir_depois_da_retirada() {
        let retirada = Utc::now();

        assert!(matches!(
            validar_devolucao(retirada, retirada - Duration::hours(1), None, None),
            Err(AppError::DevolucaoAntesDaRetirada)
        ));
        assert!(matches!(
            validar_devolucao(retirada, retirada, None, None),
            Err(AppError::DevolucaoAntesDaRetirada)
        ));
        assert!(validar_devolucao(retirada, retirada + Duration::hours(1), None, None).is_ok());
    }

    #[test]
    fn km_final_nao_pode_regredir() {
        let retirada = Utc::now();
        let devolucao = retirada + Duration::hours(4);

        assert!(matches!(
            validar_devolucao(retirada, devolucao, Some(dec!(1500.0)), Some(dec!(1499.9))),
            Err(AppError::KmFinalMenorQueInicial)
        ));
        assert!(validar_devolucao(retirada, devolucao, Some(dec!(1500.0)), Some(dec!(1500.0))).is_ok());
        assert!(validar_devolucao(retirada, devolucao, Some(dec!(1500.0)), Some(dec!(1620.5))).is_ok());
    }

    #[test]
    fn ferramenta_sem_quilometragem_passa() {
        let retirada = Utc::now();
        let devolucao = retirada + Duration::minutes(30);

        assert!(validar_devolucao(retirada, devolucao, None, None).is_ok());
        assert!(validar_devolucao(retirada, devolucao, None, Some(dec!(10))).is_ok());
    }
}

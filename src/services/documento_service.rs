// src/services/documento_service.rs

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    db::{AtivoRepository, DocumentoRepository, FuncionarioRepository},
    models::documento::{
        Documento, DocumentoTransicionado, ResumoVencimentos, StatusDocumento, TipoDono,
    },
    services::{arquivo_service::ArquivoService, notificacao_service::NotificacaoService},
};

/// Deriva o status de um documento a partir do "hoje" e da janela de aviso.
/// É a mesma regra da rotina diária, em forma pura: aplicá-la duas vezes com
/// o mesmo `hoje` dá sempre o mesmo resultado.
pub fn status_para(
    hoje: NaiveDate,
    data_vencimento: Option<NaiveDate>,
    dias_aviso: u32,
) -> StatusDocumento {
    let Some(vencimento) = data_vencimento else {
        // Sem data de vencimento o documento não vence nunca
        return StatusDocumento::Vigente;
    };

    if vencimento < hoje {
        StatusDocumento::Vencido
    } else if vencimento <= hoje + Duration::days(i64::from(dias_aviso)) {
        StatusDocumento::AVencer
    } else {
        StatusDocumento::Vigente
    }
}

#[derive(Clone)]
pub struct DocumentoService {
    documento_repo: DocumentoRepository,
    funcionario_repo: FuncionarioRepository,
    ativo_repo: AtivoRepository,
    arquivos: ArquivoService,
    notificacoes: NotificacaoService,
    pool: PgPool,
    /// Janela de aviso prévio em dias (config DIAS_AVISO_VENCIMENTO)
    dias_aviso: u32,
}

impl DocumentoService {
    pub fn new(
        documento_repo: DocumentoRepository,
        funcionario_repo: FuncionarioRepository,
        ativo_repo: AtivoRepository,
        arquivos: ArquivoService,
        notificacoes: NotificacaoService,
        pool: PgPool,
        dias_aviso: u32,
    ) -> Self {
        Self {
            documento_repo,
            funcionario_repo,
            ativo_repo,
            arquivos,
            notificacoes,
            pool,
            dias_aviso,
        }
    }

    /// O dono precisa existir DENTRO do escopo ativo: a referência etiquetada
    /// nunca aponta para fora da filial.
    async fn validar_dono(
        &self,
        escopo: EscopoFilial,
        filial_id: Uuid,
        dono_tipo: TipoDono,
        dono_id: Uuid,
    ) -> Result<(), AppError> {
        let valido = match dono_tipo {
            TipoDono::Funcionario => self.funcionario_repo.existe(escopo, dono_id).await?,
            TipoDono::Ativo => self.ativo_repo.existe(escopo, dono_id).await?,
            TipoDono::Filial => dono_id == filial_id,
        };

        if !valido {
            return Err(AppError::DonoInvalido);
        }
        Ok(())
    }

    // --- CRIAR ---
    #[allow(clippy::too_many_arguments)]
    pub async fn criar(
        &self,
        escopo: EscopoFilial,
        responsavel_id: Uuid,
        nome: &str,
        nome_arquivo: &str,
        conteudo_base64: &str,
        data_emissao: Option<NaiveDate>,
        data_vencimento: Option<NaiveDate>,
        dono_tipo: TipoDono,
        dono_id: Uuid,
    ) -> Result<Documento, AppError> {
        let filial_id = escopo.filial_exigida()?;
        self.validar_dono(escopo, filial_id, dono_tipo, dono_id).await?;

        let arquivo = self
            .arquivos
            .salvar("documentos", dono_id, nome_arquivo, conteudo_base64)
            .await?;

        // O documento já nasce com o status correto para o "hoje" atual
        let status = status_para(Utc::now().date_naive(), data_vencimento, self.dias_aviso);

        self.documento_repo
            .criar(
                &self.pool,
                filial_id,
                nome,
                &arquivo,
                data_emissao,
                data_vencimento,
                status,
                Some(responsavel_id),
                dono_tipo,
                dono_id,
                None,
            )
            .await
    }

    pub async fn listar(
        &self,
        escopo: EscopoFilial,
        status: Option<StatusDocumento>,
        dono_tipo: Option<TipoDono>,
        dono_id: Option<Uuid>,
    ) -> Result<Vec<Documento>, AppError> {
        self.documento_repo
            .listar(escopo, status, dono_tipo, dono_id)
            .await
    }

    pub async fn buscar(&self, escopo: EscopoFilial, id: Uuid) -> Result<Documento, AppError> {
        self.documento_repo
            .buscar(escopo, id)
            .await?
            .ok_or(AppError::DocumentoNaoEncontrado)
    }

    /// Abre o ficheiro do documento para download (após a busca escopada).
    pub async fn abrir_arquivo(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
    ) -> Result<(Documento, tokio::fs::File), AppError> {
        let documento = self.buscar(escopo, id).await?;
        let arquivo = self.arquivos.abrir(&documento.arquivo).await?;
        Ok((documento, arquivo))
    }

    // --- EXCLUIR ---
    /// Exclusão restrita ao responsável pelo documento ou a quem pode
    /// gerenciar a filial (gestor/superusuário).
    pub async fn excluir(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
        usuario_id: Uuid,
        pode_gerenciar: bool,
    ) -> Result<(), AppError> {
        let documento = self.buscar(escopo, id).await?;

        if !pode_gerenciar && documento.responsavel_id != Some(usuario_id) {
            return Err(AppError::AcessoNegado);
        }

        self.documento_repo.excluir(escopo, id).await?;

        // O registro já se foi; o ficheiro órfão só gera log se falhar
        self.arquivos.remover(&documento.arquivo).await;
        Ok(())
    }

    // --- RENOVAR ---
    /// Cria o documento substituto e arquiva o antigo numa única transação:
    /// ou o par (novo aponta para o antigo, antigo RENOVADO) existe completo,
    /// ou nada muda. Renovar um documento já RENOVADO é rejeitado, o que
    /// mantém a cadeia de renovação acíclica por construção.
    #[allow(clippy::too_many_arguments)]
    pub async fn renovar(
        &self,
        escopo: EscopoFilial,
        id: Uuid,
        responsavel_id: Uuid,
        nome: &str,
        nome_arquivo: &str,
        conteudo_base64: &str,
        data_emissao: Option<NaiveDate>,
        data_vencimento: Option<NaiveDate>,
    ) -> Result<Documento, AppError> {
        let filial_id = escopo.filial_exigida()?;

        let mut tx = self.pool.begin().await?;

        let antigo = self
            .documento_repo
            .buscar_para_atualizacao(&mut *tx, escopo, id)
            .await?
            .ok_or(AppError::DocumentoNaoEncontrado)?;

        if antigo.status == StatusDocumento::Renovado {
            return Err(AppError::DocumentoJaRenovado);
        }

        // Gravação do ficheiro antes das escritas no banco: se a transação
        // falhar sobra no máximo um ficheiro órfão, nunca meio-estado no banco
        let arquivo = self
            .arquivos
            .salvar("documentos", antigo.dono_id, nome_arquivo, conteudo_base64)
            .await?;

        let status = status_para(Utc::now().date_naive(), data_vencimento, self.dias_aviso);

        // O novo documento herda o dono do antigo (é o mesmo vínculo, renovado)
        let novo = self
            .documento_repo
            .criar(
                &mut *tx,
                filial_id,
                nome,
                &arquivo,
                data_emissao,
                data_vencimento,
                status,
                Some(responsavel_id),
                antigo.dono_tipo,
                antigo.dono_id,
                Some(antigo.id),
            )
            .await?;

        let afetadas = self.documento_repo.marcar_renovado(&mut *tx, antigo.id).await?;
        if afetadas == 0 {
            // Alguém renovou no meio do caminho; o rollback desfaz o novo doc
            return Err(AppError::DocumentoJaRenovado);
        }

        tx.commit().await?;

        self.notificacoes
            .notificar(
                antigo.responsavel_id,
                &format!("O documento '{}' foi renovado por '{}'.", antigo.nome, novo.nome),
            )
            .await;

        Ok(novo)
    }

    // --- ROTINA DE VENCIMENTOS ---
    /// Varredura diária, idempotente e convergente para um "hoje" fixo.
    /// Roda sem escopo de filial de propósito: é uma rotina interna, não um
    /// caminho de leitura exposto a usuários.
    pub async fn recomputar_vencimentos(
        &self,
        hoje: NaiveDate,
        dias_aviso: Option<u32>,
    ) -> Result<ResumoVencimentos, AppError> {
        let dias = dias_aviso.unwrap_or(self.dias_aviso);
        let limite_aviso = hoje + Duration::days(i64::from(dias));

        tracing::info!("Iniciando verificação de vencimentos em {}...", hoje);

        let vencidos = self.documento_repo.marcar_vencidos(&self.pool, hoje).await?;
        for doc in &vencidos {
            self.avisar_transicao(doc, "venceu").await;
        }
        if !vencidos.is_empty() {
            tracing::warn!("{} documentos atualizados para VENCIDO.", vencidos.len());
        }

        let a_vencer = self
            .documento_repo
            .marcar_a_vencer(&self.pool, hoje, limite_aviso)
            .await?;
        for doc in &a_vencer {
            self.avisar_transicao(doc, "está a vencer").await;
        }
        if !a_vencer.is_empty() {
            tracing::info!("{} documentos atualizados para A VENCER.", a_vencer.len());
        }

        // Datas corrigidas para fora da janela voltam a VIGENTE
        let revigorados = self.documento_repo.revigorar(&self.pool, limite_aviso).await?;

        tracing::info!("Verificação de vencimentos concluída.");

        Ok(ResumoVencimentos {
            vencidos: vencidos.len() as u64,
            a_vencer: a_vencer.len() as u64,
            revigorados: revigorados.len() as u64,
        })
    }

    async fn avisar_transicao(&self, doc: &DocumentoTransicionado, verbo: &str) {
        let quando = doc
            .data_vencimento
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());

        self.notificacoes
            .notificar(
                doc.responsavel_id,
                &format!("O documento '{}' {} (vencimento: {}).", doc.nome, verbo, quando),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dia(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn sem_vencimento_fica_vigente_para_sempre() {
        let hoje = dia(2026, 8, 30);
        assert_eq!(status_para(hoje, None, 30), StatusDocumento::Vigente);
    }

    #[test]
    fn vencimento_distante_e_vigente() {
        let hoje = dia(2026, 8, 30);
        let vencimento = hoje + Duration::days(31);
        assert_eq!(status_para(hoje, Some(vencimento), 30), StatusDocumento::Vigente);
    }

    #[test]
    fn dentro_da_janela_de_aviso_e_a_vencer() {
        let hoje = dia(2026, 8, 30);

        // Limites da janela, inclusive: vence hoje ou no último dia de aviso
        assert_eq!(status_para(hoje, Some(hoje), 30), StatusDocumento::AVencer);
        assert_eq!(
            status_para(hoje, Some(hoje + Duration::days(30)), 30),
            StatusDocumento::AVencer
        );
    }

    #[test]
    fn passado_do_vencimento_e_vencido() {
        let hoje = dia(2026, 8, 30);
        assert_eq!(
            status_para(hoje, Some(hoje - Duration::days(1)), 30),
            StatusDocumento::Vencido
        );
    }

    #[test]
    fn recomputo_e_idempotente_para_um_hoje_fixo() {
        let hoje = dia(2026, 8, 30);
        for dias_ate_vencer in -40i64..=40 {
            let vencimento = Some(hoje + Duration::days(dias_ate_vencer));
            let primeira = status_para(hoje, vencimento, 15);
            let segunda = status_para(hoje, vencimento, 15);
            assert_eq!(primeira, segunda);
        }
    }

    // Cenário do ciclo completo: aviso -> vencido, com janela de 15 dias.
    #[test]
    fn documento_entra_em_aviso_e_depois_vence() {
        let hoje = dia(2026, 8, 30);
        let vencimento = Some(hoje + Duration::days(10));

        // Vence em 10 dias, janela de 15: está a vencer
        assert_eq!(status_para(hoje, vencimento, 15), StatusDocumento::AVencer);

        // 11 dias depois, a data já passou: vencido
        let depois = hoje + Duration::days(11);
        assert_eq!(status_para(depois, vencimento, 15), StatusDocumento::Vencido);
    }
}

// src/services/filial_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FilialRepository,
    models::filial::{Filial, FilialMembro, PapelMembro},
};

#[derive(Clone)]
pub struct FilialService {
    filial_repo: FilialRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl FilialService {
    pub fn new(filial_repo: FilialRepository, pool: PgPool) -> Self {
        Self { filial_repo, pool }
    }

    /// Cria uma nova Filial e, atomicamente, vincula o usuário criador
    /// como o seu primeiro GESTOR.
    pub async fn criar_filial_com_gestor(
        &self,
        nome: &str,
        cnpj: Option<&str>,
        cidade: Option<&str>,
        criador_id: Uuid,
    ) -> Result<Filial, AppError> {
        let mut tx = self.pool.begin().await?;

        let nova_filial = self
            .filial_repo
            .criar_filial(&mut *tx, nome, cnpj, cidade)
            .await?;

        self.filial_repo
            .adicionar_membro(&mut *tx, nova_filial.id, criador_id, PapelMembro::Gestor)
            .await?;

        tx.commit().await?;

        Ok(nova_filial)
    }

    pub async fn listar_filiais_do_usuario(
        &self,
        usuario_id: Uuid,
    ) -> Result<Vec<Filial>, AppError> {
        self.filial_repo.listar_filiais_do_usuario(usuario_id).await
    }

    /// Adiciona um membro à filial (a filial precisa existir).
    pub async fn adicionar_membro(
        &self,
        filial_id: Uuid,
        usuario_id: Uuid,
        papel: PapelMembro,
    ) -> Result<FilialMembro, AppError> {
        self.filial_repo
            .buscar_filial(filial_id)
            .await?
            .ok_or(AppError::FilialNaoEncontrada)?;

        self.filial_repo
            .adicionar_membro(&self.pool, filial_id, usuario_id, papel)
            .await
    }

    pub async fn listar_membros(&self, filial_id: Uuid) -> Result<Vec<FilialMembro>, AppError> {
        self.filial_repo.listar_membros(filial_id).await
    }

    pub async fn buscar_filial(&self, filial_id: Uuid) -> Result<Filial, AppError> {
        self.filial_repo
            .buscar_filial(filial_id)
            .await?
            .ok_or(AppError::FilialNaoEncontrada)
    }
}

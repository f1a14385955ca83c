// src/services/funcionario_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, escopo::EscopoFilial},
    db::FuncionarioRepository,
    models::funcionario::Funcionario,
};

#[derive(Clone)]
pub struct FuncionarioService {
    funcionario_repo: FuncionarioRepository,
    pool: PgPool,
}

impl FuncionarioService {
    pub fn new(funcionario_repo: FuncionarioRepository, pool: PgPool) -> Self {
        Self { funcionario_repo, pool }
    }

    pub async fn criar(
        &self,
        escopo: EscopoFilial,
        nome_completo: &str,
        matricula: &str,
        cargo: Option<&str>,
        data_admissao: Option<NaiveDate>,
    ) -> Result<Funcionario, AppError> {
        // Cadastro sempre nasce na filial concreta do escopo
        let filial_id = escopo.filial_exigida()?;

        self.funcionario_repo
            .criar(&self.pool, filial_id, nome_completo, matricula, cargo, data_admissao)
            .await
    }

    pub async fn listar(&self, escopo: EscopoFilial) -> Result<Vec<Funcionario>, AppError> {
        self.funcionario_repo.listar(escopo).await
    }

    pub async fn buscar(&self, escopo: EscopoFilial, id: Uuid) -> Result<Funcionario, AppError> {
        self.funcionario_repo
            .buscar(escopo, id)
            .await?
            .ok_or(AppError::FuncionarioNaoEncontrado)
    }

    pub async fn desativar(&self, escopo: EscopoFilial, id: Uuid) -> Result<(), AppError> {
        self.funcionario_repo.desativar(escopo, id).await
    }
}

// src/common/escopo.rs

use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Escopo de Filial: o contexto explícito que TODA consulta escopada exige.
// ---
// Substitui o "filial ativa na sessão" do sistema antigo: em vez de estado
// ambiente, o valor é resolvido uma única vez pelo middleware e passado
// como parâmetro até o repositório. Não existe caminho de leitura que
// não receba um EscopoFilial.
//
// `TodasAsFiliais` só é construído pelo middleware para superusuários;
// qualquer outro pedido sem filial resolvida é rejeitado antes de
// qualquer consulta (falha fechada E ruidosa).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscopoFilial {
    /// Visão restrita a uma única filial.
    Filial(Uuid),
    /// Visão global (apenas superusuários).
    TodasAsFiliais,
}

impl EscopoFilial {
    /// Parâmetro para as consultas: as queries usam o padrão
    /// `($1::uuid IS NULL OR filial_id = $1)`, então `None` significa
    /// "sem restrição", e só o middleware produz esse valor.
    pub fn filtro(&self) -> Option<Uuid> {
        match self {
            EscopoFilial::Filial(id) => Some(*id),
            EscopoFilial::TodasAsFiliais => None,
        }
    }

    /// Escritas precisam de uma filial concreta: não se cria um registro
    /// "em todas as filiais".
    pub fn filial_exigida(&self) -> Result<Uuid, AppError> {
        match self {
            EscopoFilial::Filial(id) => Ok(*id),
            EscopoFilial::TodasAsFiliais => Err(AppError::FilialNaoSelecionada),
        }
    }

    /// Um registro carregado pertence a este escopo?
    pub fn abrange(&self, filial_id: Uuid) -> bool {
        match self {
            EscopoFilial::Filial(id) => *id == filial_id,
            EscopoFilial::TodasAsFiliais => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escopo_de_filial_filtra_pela_propria_filial() {
        let filial = Uuid::new_v4();
        let escopo = EscopoFilial::Filial(filial);

        assert_eq!(escopo.filtro(), Some(filial));
        assert!(escopo.abrange(filial));
        assert!(!escopo.abrange(Uuid::new_v4()));
    }

    #[test]
    fn escopo_global_nao_restringe() {
        let escopo = EscopoFilial::TodasAsFiliais;

        assert_eq!(escopo.filtro(), None);
        assert!(escopo.abrange(Uuid::new_v4()));
    }

    #[test]
    fn escrita_exige_filial_concreta() {
        let filial = Uuid::new_v4();
        assert_eq!(
            EscopoFilial::Filial(filial).filial_exigida().unwrap(),
            filial
        );
        assert!(matches!(
            EscopoFilial::TodasAsFiliais.filial_exigida(),
            Err(AppError::FilialNaoSelecionada)
        ));
    }
}

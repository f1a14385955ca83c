// src/services/arquivo_service.rs

use std::path::{Component, Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Armazenamento privado de ficheiros
// ---
// Documentos e assinaturas chegam em base64 no corpo JSON e são gravados
// numa pasta privada organizada pelo dono, fora de qualquer raiz pública:
// <raiz>/<categoria>/<dono>/<uuid>-<nome>. O download passa sempre pelo
// handler, que faz a checagem de escopo/permissão antes de servir.
#[derive(Clone)]
pub struct ArquivoService {
    raiz: PathBuf,
}

impl ArquivoService {
    pub fn new(raiz: PathBuf) -> Self {
        Self { raiz }
    }

    /// Grava o conteúdo e devolve o caminho RELATIVO à raiz (o que vai para
    /// a coluna `arquivo`).
    pub async fn salvar(
        &self,
        categoria: &str,
        dono: Uuid,
        nome_original: &str,
        conteudo_base64: &str,
    ) -> Result<String, AppError> {
        let nome_seguro = sanitizar_nome(nome_original)?;
        let conteudo = BASE64
            .decode(conteudo_base64)
            .map_err(|_| AppError::Base64Invalido)?;

        let relativo = format!("{}/{}/{}-{}", categoria, dono, Uuid::new_v4(), nome_seguro);
        let destino = self.raiz.join(&relativo);

        if let Some(pasta) = destino.parent() {
            tokio::fs::create_dir_all(pasta).await?;
        }
        tokio::fs::write(&destino, &conteudo).await?;

        Ok(relativo)
    }

    /// Abre um ficheiro gravado para streaming no download.
    pub async fn abrir(&self, caminho_relativo: &str) -> Result<tokio::fs::File, AppError> {
        let caminho = self.resolver(caminho_relativo)?;
        match tokio::fs::File::open(&caminho).await {
            Ok(f) => Ok(f),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::ArquivoNaoEncontrado)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove o ficheiro físico. Falha silenciosa vira log: a exclusão do
    /// registro no banco não pode ficar refém do filesystem.
    pub async fn remover(&self, caminho_relativo: &str) {
        match self.resolver(caminho_relativo) {
            Ok(caminho) => {
                if let Err(e) = tokio::fs::remove_file(&caminho).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!("Falha ao remover arquivo '{}': {}", caminho_relativo, e);
                    }
                }
            }
            Err(_) => {
                tracing::warn!("Caminho de arquivo inválido ao remover: '{}'", caminho_relativo);
            }
        }
    }

    /// Resolve o caminho relativo dentro da raiz, rejeitando qualquer
    /// tentativa de escapar dela.
    fn resolver(&self, caminho_relativo: &str) -> Result<PathBuf, AppError> {
        let relativo = Path::new(caminho_relativo);
        if relativo.is_absolute()
            || relativo
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::CaminhoInvalido);
        }
        Ok(self.raiz.join(relativo))
    }
}

/// Mantém só o nome-base do ficheiro enviado, sem separadores de caminho.
fn sanitizar_nome(nome: &str) -> Result<String, AppError> {
    let base = Path::new(nome)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(AppError::CaminhoInvalido)?;

    if base.is_empty() || base == ".." {
        return Err(AppError::CaminhoInvalido);
    }
    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_de_arquivo_perde_o_caminho() {
        assert_eq!(sanitizar_nome("laudo.pdf").unwrap(), "laudo.pdf");
        assert_eq!(sanitizar_nome("/etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitizar_nome("a/b/c.png").unwrap(), "c.png");
    }

    #[test]
    fn caminho_fora_da_raiz_e_rejeitado() {
        let svc = ArquivoService::new(PathBuf::from("/tmp/arquivos"));

        assert!(svc.resolver("documentos/x/laudo.pdf").is_ok());
        assert!(matches!(
            svc.resolver("../segredos.txt"),
            Err(AppError::CaminhoInvalido)
        ));
        assert!(matches!(
            svc.resolver("/etc/passwd"),
            Err(AppError::CaminhoInvalido)
        ));
        assert!(matches!(
            svc.resolver("documentos/../../x"),
            Err(AppError::CaminhoInvalido)
        ));
    }
}

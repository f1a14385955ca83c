// src/services/termo_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::error::AppError,
    models::ativo::{Ativo, Movimentacao, TipoAtivo},
};

/// Gera o termo de responsabilidade (PDF) de uma movimentação.
#[derive(Clone)]
pub struct TermoService;

impl TermoService {
    pub fn new() -> Self {
        Self
    }

    pub fn gerar(
        &self,
        movimentacao: &Movimentacao,
        ativo: &Ativo,
        filial_nome: &str,
    ) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::PdfError("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Termo de Responsabilidade - {}", ativo.codigo_identificacao));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("TERMO DE RESPONSABILIDADE")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("Filial: {}", filial_nome))
                .styled(style::Style::new().with_font_size(10)),
        );

        doc.push(elements::Break::new(1.5));

        let tipo = match ativo.tipo {
            TipoAtivo::Ferramenta => "FERRAMENTA",
            TipoAtivo::Veiculo => "VEÍCULO",
        };
        doc.push(
            elements::Paragraph::new(format!("RETIRADA DE {} #{}", tipo, ativo.codigo_identificacao))
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        doc.push(elements::Paragraph::new(format!(
            "Data da retirada: {}",
            movimentacao.data_retirada.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Devolução prevista: {}",
            movimentacao.data_devolucao_prevista.format("%d/%m/%Y %H:%M")
        )));

        doc.push(elements::Break::new(2));

        // --- DADOS DO ATIVO ---
        let mut table = elements::TableLayout::new(vec![2, 4]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        let mut linha = |rotulo: &str, valor: String| {
            table
                .row()
                .element(elements::Paragraph::new(rotulo).styled(style_bold))
                .element(elements::Paragraph::new(valor))
                .push()
                .expect("Table row error");
        };

        linha("Ativo", ativo.nome.clone());
        linha("Código", ativo.codigo_identificacao.clone());
        if let Some(patrimonio) = &ativo.patrimonio {
            linha("Patrimônio", patrimonio.clone());
        }
        if let Some(placa) = &ativo.placa {
            linha("Placa", placa.clone());
        }
        if let Some(km) = movimentacao.km_inicial {
            linha("Km na retirada", format!("{:.1}", km));
        }
        linha("Condições na retirada", movimentacao.condicoes_retirada.clone());

        doc.push(table);
        doc.push(elements::Break::new(2));

        doc.push(elements::Paragraph::new(
            "Declaro ter recebido o ativo acima nas condições descritas e assumo a \
             responsabilidade pela sua guarda e conservação até a devolução.",
        ));

        doc.push(elements::Break::new(2));

        // --- QR CODE DE CONFERÊNCIA ---
        // O payload identifica o ativo para conferência rápida no pátio
        let payload = format!("ATIVO:{}", ativo.codigo_identificacao);
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::PdfError(e.to_string()))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        doc.push(elements::Break::new(2));
        doc.push(
            elements::Paragraph::new("___________________________________________")
                .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(
            elements::Paragraph::new("Assinatura do responsável pela retirada")
                .styled(style::Style::new().italic().with_font_size(8)),
        );

        // Renderiza para buffer em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(buffer)
    }
}

impl Default for TermoService {
    fn default() -> Self {
        Self::new()
    }
}

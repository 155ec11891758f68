use crate::layout::TemplateLayout;
use crate::pdf::{fill_invoice, PdfError};
use crate::sheet::{parse_invoice, SheetError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)] Sheet(#[from] SheetError),
    #[error(transparent)] Pdf(#[from] PdfError),
}

#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Spreadsheet in, filled template out. Blocking; call it off the async runtime.
pub fn render_invoice(template: &[u8], spreadsheet: &[u8], layout: &TemplateLayout) -> Result<RenderedInvoice, InvoiceError> {
    let data = parse_invoice(spreadsheet)?;
    let bytes = fill_invoice(template, &data, layout)?;
    Ok(RenderedInvoice { filename: data.output_filename(), bytes })
}

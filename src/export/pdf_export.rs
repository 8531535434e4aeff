use crate::errors::{AppError, AppResult};
use crate::export::pdf::PdfManager;
use crate::export::{ExportRow, notify_export_success};
use crate::ui::messages::info;
use std::path::Path;

pub(crate) fn export_pdf<T: ExportRow>(
    rows: &[T],
    path: &Path,
    title: &str,
    subtitle: Option<&str>,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let headers = T::headers();
    let table: Vec<Vec<String>> = rows.iter().map(ExportRow::to_row).collect();

    // wide tables go landscape
    let mut pdf = PdfManager::new(headers.len() > 7);
    pdf.write_table(title, subtitle, &headers, &table);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}

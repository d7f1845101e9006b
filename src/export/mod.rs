//! Excel export of register entries.

mod form;
mod layout;

pub use form::{ExportForm, ExportType};
pub use layout::{Cell, CellStyle, layout};

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::db;
use crate::error::AppError;
use crate::models::Entry;
use crate::settings::AppSettings;

pub const SHEET_NAME: &str = "Записи";

/// Narrowest column width, in characters.
pub const MIN_COLUMN_WIDTH: usize = 20;

/// Excel rejects wider columns.
const MAX_COLUMN_WIDTH: usize = 255;

/// Where an export was written and how many entries it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub count: usize,
}

/// Write entries as bordered blocks to a single-sheet workbook.
pub fn export_entries_to_excel(entries: &[Entry], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name(SHEET_NAME)?;

    let title_format = Format::new().set_bold().set_font_color(Color::Red);
    let bold_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let plain_format = Format::new().set_border(FormatBorder::Thin);

    let cells = layout(entries);

    for cell in &cells {
        let format = match cell.style {
            CellStyle::Title => &title_format,
            CellStyle::Bold => &bold_format,
            CellStyle::Plain => &plain_format,
        };
        if cell.is_merged() {
            worksheet.merge_range(cell.row, cell.first_col, cell.row, cell.last_col, &cell.text, format)?;
        } else {
            worksheet.write_string_with_format(cell.row, cell.first_col, &cell.text, format)?;
        }
    }

    for (col, width) in column_widths(&cells).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Width per column, fitted to the single-column cells it holds.
pub fn column_widths(cells: &[Cell]) -> Vec<usize> {
    let columns = cells.iter().map(|c| c.last_col as usize + 1).max().unwrap_or(0);
    let mut widths = vec![MIN_COLUMN_WIDTH; columns];

    for cell in cells.iter().filter(|c| !c.is_merged()) {
        let width = &mut widths[cell.first_col as usize];
        *width = (*width).max(cell.text.chars().count() + 2).min(MAX_COLUMN_WIDTH);
    }
    widths
}

/// Validate the form, load the matching entries and write the workbook.
///
/// A blank folder or file name falls back to the export defaults in `settings`.
/// No entries still produce a workbook with the empty sheet.
pub async fn export_for_form(
    db: &DatabaseConnection,
    settings: &AppSettings,
    form: &ExportForm,
) -> Result<ExportOutcome, AppError> {
    let mut form = form.clone();
    let defaults = ExportForm::from_settings(settings, form.export_type);
    if form.folder.as_os_str().is_empty() {
        form.folder = defaults.folder;
    }
    if form.file_name.trim().is_empty() {
        form.file_name = defaults.file_name;
    }

    form.validate()?;
    let (start, end) = form.date_range()?;
    let path = form.output_path()?;

    let entries = db::entry::list_for_export(db, start, end, form.company()).await?;
    let count = entries.len();

    tokio::fs::create_dir_all(&form.folder)
        .await
        .inspect_err(|e| error!(folder = %form.folder.display(), "Failed to create export folder: {e}"))?;

    let target = path.clone();
    tokio::task::spawn_blocking(move || export_entries_to_excel(&entries, &target))
        .await?
        .inspect_err(|e| error!(path = %path.display(), "Failed to write export: {e}"))?;

    info!(
        path = %path.display(),
        count,
        export_type = %form.export_type,
        "Exported {count} entries from {start} to {end}"
    );

    Ok(ExportOutcome { path, count })
}

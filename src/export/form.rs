//! Export request: which period, where to write, and under what name.

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::settings::AppSettings;
use crate::utils::default_download_folder;

const EXTENSION: &str = ".xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportType {
    #[default]
    Day,
    Month,
    Year,
    Range,
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportType::Day => "day",
            ExportType::Month => "month",
            ExportType::Year => "year",
            ExportType::Range => "range",
        };
        f.write_str(name)
    }
}

/// Filled-in export request. Only the date fields of the chosen type are used.
#[derive(Debug, Clone, Default)]
pub struct ExportForm {
    pub export_type: ExportType,
    pub day: Option<NaiveDate>,
    /// Any date inside the month.
    pub month: Option<NaiveDate>,
    pub year: Option<i32>,
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
    pub folder: PathBuf,
    pub file_name: String,
    pub company: Option<String>,
}

impl ExportForm {
    /// Empty form pre-filled with the export defaults from the settings.
    pub fn from_settings(settings: &AppSettings, export_type: ExportType) -> Self {
        Self {
            export_type,
            folder: settings
                .export_preferred_download_destination
                .clone()
                .unwrap_or_else(default_download_folder),
            file_name: settings.export_default_file_name.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.folder.as_os_str().is_empty() {
            return Err(AppError::validation("Export folder is required"));
        }
        let name = self.base_name();
        if name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        if name.contains(['/', '\\']) {
            return Err(AppError::validation("File name must not contain path separators"));
        }
        self.date_range().map(|_| ())
    }

    /// Inclusive date range selected by the export type.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        match self.export_type {
            ExportType::Day => {
                let day = self.day.ok_or_else(|| AppError::validation("Day is required"))?;
                Ok((day, day))
            }
            ExportType::Month => {
                let date = self.month.ok_or_else(|| AppError::validation("Month is required"))?;
                month_bounds(date.year(), date.month())
            }
            ExportType::Year => {
                let year = self.year.ok_or_else(|| AppError::validation("Year is required"))?;
                let start = NaiveDate::from_ymd_opt(year, 1, 1);
                let end = NaiveDate::from_ymd_opt(year, 12, 31);
                start
                    .zip(end)
                    .ok_or_else(|| AppError::validation(format!("Year {year} is out of range")))
            }
            ExportType::Range => {
                let start = self
                    .range_start
                    .ok_or_else(|| AppError::validation("Start date is required"))?;
                let end = self.range_end.ok_or_else(|| AppError::validation("End date is required"))?;
                if start > end {
                    return Err(AppError::validation("Start date must not be after end date"));
                }
                Ok((start, end))
            }
        }
    }

    /// Output file name with the period appended, e.g. `staff_entries_2025-03.xlsx`.
    pub fn resolved_file_name(&self) -> Result<String> {
        let name = self.base_name();
        let (start, end) = self.date_range()?;
        let suffix = match self.export_type {
            ExportType::Day => start.format("%Y-%m-%d").to_string(),
            ExportType::Month => start.format("%Y-%m").to_string(),
            ExportType::Year => start.format("%Y").to_string(),
            ExportType::Range => format!("{}_{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
        };
        Ok(format!("{name}_{suffix}{EXTENSION}"))
    }

    pub fn output_path(&self) -> Result<PathBuf> {
        Ok(self.folder.join(self.resolved_file_name()?))
    }

    /// Company filter, if one was given.
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    fn base_name(&self) -> &str {
        let name = self.file_name.trim();
        match name.len().checked_sub(EXTENSION.len()) {
            Some(at) if name.is_char_boundary(at) && name[at..].eq_ignore_ascii_case(EXTENSION) => {
                name[..at].trim_end()
            }
            _ => name,
        }
    }
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1);
    let end = start
        .and_then(|s| s.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt());
    start
        .zip(end)
        .ok_or_else(|| AppError::validation(format!("Month {year}-{month:02} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(export_type: ExportType) -> ExportForm {
        ExportForm {
            export_type,
            folder: PathBuf::from("out"),
            file_name: "staff_entries".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_day_export() {
        let mut f = form(ExportType::Day);
        f.day = Some(date(2025, 3, 7));

        assert_eq!(f.date_range().unwrap(), (date(2025, 3, 7), date(2025, 3, 7)));
        assert_eq!(f.resolved_file_name().unwrap(), "staff_entries_2025-03-07.xlsx");
        assert_eq!(f.output_path().unwrap(), PathBuf::from("out").join("staff_entries_2025-03-07.xlsx"));
    }

    #[test]
    fn test_month_export_covers_whole_month() {
        let mut f = form(ExportType::Month);
        f.month = Some(date(2024, 2, 17));

        assert_eq!(f.date_range().unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(f.resolved_file_name().unwrap(), "staff_entries_2024-02.xlsx");

        f.month = Some(date(2025, 12, 1));
        assert_eq!(f.date_range().unwrap(), (date(2025, 12, 1), date(2025, 12, 31)));
    }

    #[test]
    fn test_year_export() {
        let mut f = form(ExportType::Year);
        f.year = Some(2025);

        assert_eq!(f.date_range().unwrap(), (date(2025, 1, 1), date(2025, 12, 31)));
        assert_eq!(f.resolved_file_name().unwrap(), "staff_entries_2025.xlsx");
    }

    #[test]
    fn test_range_export() {
        let mut f = form(ExportType::Range);
        f.range_start = Some(date(2025, 1, 10));
        f.range_end = Some(date(2025, 2, 5));

        assert_eq!(f.resolved_file_name().unwrap(), "staff_entries_2025-01-10_2025-02-05.xlsx");

        f.range_end = Some(date(2025, 1, 1));
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_date_is_rejected() {
        for export_type in [ExportType::Day, ExportType::Month, ExportType::Year, ExportType::Range] {
            let f = form(export_type);
            assert!(matches!(f.validate(), Err(AppError::Validation(_))), "{export_type}");
        }
    }

    #[test]
    fn test_folder_and_name_are_required() {
        let mut f = form(ExportType::Day);
        f.day = Some(date(2025, 3, 7));
        assert!(f.validate().is_ok());

        f.file_name = "   ".to_string();
        assert!(f.validate().is_err());

        f.file_name = "sub/name".to_string();
        assert!(f.validate().is_err());

        f.file_name = "name".to_string();
        f.folder = PathBuf::new();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_typed_extension_is_not_doubled() {
        let mut f = form(ExportType::Year);
        f.year = Some(2025);
        f.file_name = "report.XLSX".to_string();

        assert_eq!(f.resolved_file_name().unwrap(), "report_2025.xlsx");
    }

    #[test]
    fn test_from_settings_uses_export_defaults() {
        let settings = AppSettings {
            export_default_file_name: Some("назначения".to_string()),
            export_preferred_download_destination: Some(PathBuf::from("/tmp/exports")),
            ..Default::default()
        };
        let f = ExportForm::from_settings(&settings, ExportType::Month);

        assert_eq!(f.export_type, ExportType::Month);
        assert_eq!(f.file_name, "назначения");
        assert_eq!(f.folder, PathBuf::from("/tmp/exports"));
        assert_eq!(f.company(), None);

        let cleared = AppSettings {
            export_default_file_name: None,
            ..settings
        };
        let f = ExportForm::from_settings(&cleared, ExportType::Day);
        assert!(f.file_name.is_empty());
    }
}

//! Per-user application settings stored in `app_settings.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::file_store::JsonFileStore;
use crate::utils::default_download_folder;

pub const SETTINGS_FILE_NAME: &str = "app_settings.json";

/// Cultures the application ships translations for.
pub const SUPPORTED_CULTURES: [&str; 2] = ["bg-BG", "en-US"];

pub const DEFAULT_CULTURE: &str = "bg-BG";

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub culture: Option<String>,

    // Grid state saving
    pub grid_state_sorts_saving: bool,
    pub grid_state_filters_saving: bool,
    pub grid_state_page_size_saving: bool,
    pub grid_state_page_index_saving: bool,
    pub grid_state_hidden_columns_saving: bool,

    // Form fields remembered between entries
    pub form_create_new: bool,
    pub form_field_entry_date: bool,
    pub form_field_company: bool,
    pub form_field_division: bool,

    // Export defaults
    pub export_default_file_name: Option<String>,
    pub export_preferred_download_destination: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            culture: Some(DEFAULT_CULTURE.to_string()),
            grid_state_sorts_saving: true,
            grid_state_filters_saving: true,
            grid_state_page_size_saving: true,
            grid_state_page_index_saving: true,
            grid_state_hidden_columns_saving: true,
            form_create_new: false,
            form_field_entry_date: false,
            form_field_company: false,
            form_field_division: false,
            export_default_file_name: Some("staff_entries".to_string()),
            export_preferred_download_destination: Some(default_download_folder()),
        }
    }
}

impl AppSettings {
    /// Whether any part of the grid state is remembered.
    pub fn is_grid_state_saving_enabled(&self) -> bool {
        self.grid_state_sorts_saving
            || self.grid_state_filters_saving
            || self.grid_state_page_size_saving
            || self.grid_state_page_index_saving
            || self.grid_state_hidden_columns_saving
    }

    /// Culture in effect, falling back to Bulgarian.
    pub fn culture(&self) -> &str {
        self.culture.as_deref().unwrap_or(DEFAULT_CULTURE)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(culture) = &self.culture
            && !SUPPORTED_CULTURES.contains(&culture.as_str())
        {
            return Err(AppError::validation(format!(
                "Unsupported culture {culture:?}, expected one of {}",
                SUPPORTED_CULTURES.join(", ")
            )));
        }
        Ok(())
    }

    /// Set a field by its JSON (camelCase) name from text input.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let flag = || parse_flag(key, value);
        let text = || Some(value.trim().to_string()).filter(|v| !v.is_empty());

        match key {
            "culture" => self.culture = text(),
            "gridStateSortsSaving" => self.grid_state_sorts_saving = flag()?,
            "gridStateFiltersSaving" => self.grid_state_filters_saving = flag()?,
            "gridStatePageSizeSaving" => self.grid_state_page_size_saving = flag()?,
            "gridStatePageIndexSaving" => self.grid_state_page_index_saving = flag()?,
            "gridStateHiddenColumnsSaving" => self.grid_state_hidden_columns_saving = flag()?,
            "formCreateNew" => self.form_create_new = flag()?,
            "formFieldEntryDate" => self.form_field_entry_date = flag()?,
            "formFieldCompany" => self.form_field_company = flag()?,
            "formFieldDivision" => self.form_field_division = flag()?,
            "exportDefaultFileName" => self.export_default_file_name = text(),
            "exportPreferredDownloadDestination" => {
                self.export_preferred_download_destination = text().map(PathBuf::from)
            }
            _ => return Err(AppError::validation(format!("Unknown setting: {key}"))),
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AppError::validation(format!("{key} expects true or false, got {value:?}"))),
    }
}

/// Loads settings on first use and writes every change back to disk.
pub struct AppSettingsService {
    store: JsonFileStore<AppSettings>,
}

impl AppSettingsService {
    /// Settings kept in `data_dir/app_settings.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(SETTINGS_FILE_NAME))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            store: JsonFileStore::new(path, "App settings", AppSettings::default),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub async fn get(&self) -> AppSettings {
        self.store.get().await
    }

    /// Validate and store new settings, returning what was stored.
    pub async fn update(&self, settings: AppSettings) -> Result<AppSettings> {
        settings.validate()?;
        Ok(self.store.replace(settings).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.culture(), "bg-BG");
        assert!(settings.is_grid_state_saving_enabled());
        assert!(!settings.form_create_new);
        assert_eq!(settings.export_default_file_name.as_deref(), Some("staff_entries"));
        assert!(settings.export_preferred_download_destination.is_some());
    }

    #[test]
    fn test_grid_saving_disabled_when_all_off() {
        let mut settings = AppSettings::default();
        for key in [
            "gridStateSortsSaving",
            "gridStateFiltersSaving",
            "gridStatePageSizeSaving",
            "gridStatePageIndexSaving",
        ] {
            settings.set_field(key, "false").unwrap();
        }
        assert!(settings.is_grid_state_saving_enabled());

        settings.set_field("gridStateHiddenColumnsSaving", "no").unwrap();
        assert!(!settings.is_grid_state_saving_enabled());
    }

    #[test]
    fn test_set_field_rejects_unknown_and_bad_flags() {
        let mut settings = AppSettings::default();
        assert!(settings.set_field("theme", "dark").is_err());
        assert!(settings.set_field("formCreateNew", "maybe").is_err());
    }

    #[test]
    fn test_json_is_camel_case_and_tolerates_missing_fields() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert!(json.get("gridStatePageSizeSaving").is_some());
        assert!(json.get("isGridStateSavingEnabled").is_none());

        let partial: AppSettings = serde_json::from_str(r#"{"culture": "en-US"}"#).unwrap();
        assert_eq!(partial.culture(), "en-US");
        assert!(partial.grid_state_sorts_saving);
    }

    #[tokio::test]
    async fn test_service_update_validates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let service = AppSettingsService::new(dir.path());

        let mut settings = service.get().await;
        settings.culture = Some("de-DE".to_string());
        assert!(service.update(settings.clone()).await.is_err());

        settings.culture = Some("en-US".to_string());
        settings.form_field_company = true;
        service.update(settings).await.unwrap();

        let reopened = AppSettingsService::new(dir.path());
        let loaded = reopened.get().await;
        assert_eq!(loaded.culture(), "en-US");
        assert!(loaded.form_field_company);
    }
}

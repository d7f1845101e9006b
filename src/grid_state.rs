//! Entry list grid state stored in `entry_grid_state.json`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::file_store::JsonFileStore;
use crate::settings::AppSettings;

pub const GRID_STATE_FILE_NAME: &str = "entry_grid_state.json";

pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Sort direction of a column. Stored as its numeric code (`0` none,
/// `1` ascending, `2` descending); the lowercase names are accepted on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Ascending => 1,
            Self::Descending => 2,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Ascending),
            2 => Some(Self::Descending),
            _ => None,
        }
    }
}

impl Serialize for SortDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let direction = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n.as_u64().and_then(Self::from_code),
            serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "none" => Some(Self::None),
                "ascending" => Some(Self::Ascending),
                "descending" => Some(Self::Descending),
                _ => None,
            },
            serde_json::Value::Null => Some(Self::None),
            _ => None,
        };
        direction.ok_or_else(|| D::Error::custom("expected sort direction 0, 1 or 2"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSortState {
    pub property_name: String,
    #[serde(default)]
    pub direction: SortDirection,
    /// Position among the active sorts; lower sorts first.
    #[serde(default)]
    pub index: i32,
}

/// Primitive value a column filter compares against.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    /// Strings, including date-time strings; dates are parsed when compared.
    Text(String),
}

impl FilterValue {
    /// Value typed on the command line: `true`/`false` become booleans, anything
    /// else stays text.
    pub fn from_text(text: &str) -> Self {
        match parse_bool(text) {
            Some(b) => Self::Bool(b),
            None => Self::Text(text.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(t) => parse_bool(t),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            Self::Text(t) => t.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(t) => parse_date_time(t).map(|dt| dt.date()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Text(t) => t.clone(),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Decimal(d) => serializer.serialize_f64(*d),
            Self::Text(t) => serializer.serialize_str(t),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Integer(i)),
                None => n
                    .as_f64()
                    .map(Self::Decimal)
                    .ok_or_else(|| D::Error::custom(format!("Unsupported number: {n}"))),
            },
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            other => Err(D::Error::custom(format!("Unsupported filter value: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilterState {
    pub property_name: String,
    pub operator: String,
    #[serde(default)]
    pub value: FilterValue,
}

/// Sorting, filtering, paging and column visibility of the entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryGridState {
    pub sorts: Vec<ColumnSortState>,
    pub filters: Vec<ColumnFilterState>,
    pub page_size: i32,
    pub page_index: i32,
    pub hidden_columns: Vec<String>,
}

impl Default for EntryGridState {
    fn default() -> Self {
        Self {
            sorts: Vec::new(),
            filters: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            hidden_columns: Vec::new(),
        }
    }
}

impl EntryGridState {
    /// Nothing beyond the grid's own page size of 5 (or none) is remembered.
    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
            && self.filters.is_empty()
            && (self.page_size == 5 || self.page_size == 0)
            && self.page_index == 0
            && self.hidden_columns.is_empty()
    }

    /// This state with the parts the settings do not remember reset to defaults.
    pub fn restricted_to(&self, settings: &AppSettings) -> Self {
        let defaults = Self::default();
        Self {
            sorts: if settings.grid_state_sorts_saving { self.sorts.clone() } else { defaults.sorts },
            filters: if settings.grid_state_filters_saving { self.filters.clone() } else { defaults.filters },
            page_size: if settings.grid_state_page_size_saving { self.page_size } else { defaults.page_size },
            page_index: if settings.grid_state_page_index_saving { self.page_index } else { defaults.page_index },
            hidden_columns: if settings.grid_state_hidden_columns_saving {
                self.hidden_columns.clone()
            } else {
                defaults.hidden_columns
            },
        }
    }
}

/// Loads grid state on first use and writes every change back to disk.
pub struct EntryGridStateService {
    store: JsonFileStore<EntryGridState>,
}

impl EntryGridStateService {
    /// State kept in `data_dir/entry_grid_state.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(GRID_STATE_FILE_NAME))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            store: JsonFileStore::new(path, "Entry grid state", EntryGridState::default),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub async fn get(&self) -> EntryGridState {
        self.store.get().await
    }

    pub async fn update_sorts(&self, sorts: Vec<ColumnSortState>) -> EntryGridState {
        self.store.update(|state| state.sorts = sorts).await
    }

    pub async fn update_filters(&self, filters: Vec<ColumnFilterState>) -> EntryGridState {
        self.store.update(|state| state.filters = filters).await
    }

    pub async fn update_paging(&self, page_size: i32, page_index: i32) -> EntryGridState {
        self.store
            .update(|state| {
                state.page_size = page_size;
                state.page_index = page_index;
            })
            .await
    }

    pub async fn update_hidden_columns(&self, hidden_columns: Vec<String>) -> EntryGridState {
        self.store.update(|state| state.hidden_columns = hidden_columns).await
    }

    pub async fn update_full_state(&self, state: EntryGridState) -> EntryGridState {
        self.store.replace(state).await
    }

    /// Store the parts of `state` the settings allow; other parts keep their stored values.
    pub async fn save_for(&self, settings: &AppSettings, state: EntryGridState) -> EntryGridState {
        if !settings.is_grid_state_saving_enabled() {
            return self.get().await;
        }

        self.store
            .update(|stored| {
                if settings.grid_state_sorts_saving {
                    stored.sorts = state.sorts;
                }
                if settings.grid_state_filters_saving {
                    stored.filters = state.filters;
                }
                if settings.grid_state_page_size_saving {
                    stored.page_size = state.page_size;
                }
                if settings.grid_state_page_index_saving {
                    stored.page_index = state.page_index;
                }
                if settings.grid_state_hidden_columns_saving {
                    stored.hidden_columns = state.hidden_columns;
                }
            })
            .await
    }

    /// Stored state limited to what the settings remember.
    pub async fn restore_for(&self, settings: &AppSettings) -> EntryGridState {
        self.get().await.restricted_to(settings)
    }
}

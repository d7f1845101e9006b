//! Fields shared by every register entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Appointment, Dismissal};
use crate::error::{AppError, Result};

/// Kind of register entry. Persisted as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Appointment = 0,
    Dismissal = 1,
}

impl EntryType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Appointment),
            1 => Some(Self::Dismissal),
            _ => None,
        }
    }

    /// Bulgarian block title used in exports.
    pub fn title_bg(self) -> &'static str {
        match self {
            Self::Appointment => "За назначаване",
            Self::Dismissal => "За уволнение",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appointment => f.write_str("Appointment"),
            Self::Dismissal => f.write_str("Dismissal"),
        }
    }
}

/// Person and company data common to appointments and dismissals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBase {
    /// Assigned by the store; ignored on create.
    #[serde(default)]
    pub id: i32,
    pub entry_date: NaiveDate,
    pub considered_from_date: NaiveDate,
    #[serde(default, rename = "isNRAConfirmed")]
    pub is_nra_confirmed: bool,
    pub company_name: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(rename = "IDN")]
    pub idn: String,
    pub first_name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    pub surname: String,
}

impl EntryBase {
    /// First, second (when present) and surname separated by single spaces.
    pub fn full_name(&self) -> String {
        [Some(self.first_name.as_str()), self.second_name.as_deref(), Some(self.surname.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Integrity checks applied before the entry is stored.
    pub fn validate(&self) -> Result<()> {
        require("companyName", &self.company_name)?;
        require("firstName", &self.first_name)?;
        require("surname", &self.surname)?;
        require("IDN", &self.idn)?;
        if !is_digits(&self.idn, 10) {
            return Err(AppError::validation("IDN must be exactly 10 digits"));
        }
        Ok(())
    }
}

/// A stored appointment or dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Entry {
    Appointment(Appointment),
    Dismissal(Dismissal),
}

impl Entry {
    pub fn base(&self) -> &EntryBase {
        match self {
            Self::Appointment(a) => &a.base,
            Self::Dismissal(d) => &d.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut EntryBase {
        match self {
            Self::Appointment(a) => &mut a.base,
            Self::Dismissal(d) => &mut d.base,
        }
    }

    pub fn id(&self) -> i32 {
        self.base().id
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Appointment(_) => EntryType::Appointment,
            Self::Dismissal(_) => EntryType::Dismissal,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Appointment(a) => a.validate(),
            Self::Dismissal(d) => d.validate(),
        }
    }
}

impl From<Appointment> for Entry {
    fn from(value: Appointment) -> Self {
        Self::Appointment(value)
    }
}

impl From<Dismissal> for Entry {
    fn from(value: Dismissal) -> Self {
        Self::Dismissal(value)
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
pub(crate) fn sample_base(idn: &str) -> EntryBase {
    EntryBase {
        id: 0,
        entry_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        considered_from_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        is_nra_confirmed: false,
        company_name: "ТехноСофт ООД".to_string(),
        division: None,
        idn: idn.to_string(),
        first_name: "Иван".to_string(),
        second_name: None,
        surname: "Иванов".to_string(),
    }
}

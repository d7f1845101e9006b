//! Appointment (hiring) entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entry::{is_digits, require};
use super::{Amount, EntryBase};
use crate::error::{AppError, Result};

/// Salary currency. Persisted as its ISO code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "BGN")]
    Bgn,
    #[default]
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Bgn => "BGN",
            Self::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BGN" => Ok(Self::Bgn),
            "EUR" => Ok(Self::Eur),
            other => Err(AppError::parse(format!("Unknown currency: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(flatten)]
    pub base: EntryBase,
    pub salary: Amount,
    #[serde(default)]
    pub currency: Currency,
    pub position: String,
    #[serde(default)]
    pub work_experience_days: Option<i32>,
    #[serde(default)]
    pub work_experience_in_profession_days: Option<i32>,
    #[serde(default)]
    pub contract_date: Option<NaiveDate>,
    #[serde(default)]
    pub working_hours: Option<i32>,
    #[serde(default)]
    pub id_card_number: Option<String>,
    #[serde(default)]
    pub id_card_date: Option<NaiveDate>,
    #[serde(default)]
    pub id_card_authority: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Appointment {
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if !self.salary.is_positive() {
            return Err(AppError::validation("Salary must be positive"));
        }
        require("position", &self.position)?;
        if self.work_experience_days.is_some_and(|d| d < 0) {
            return Err(AppError::validation("Work experience cannot be negative"));
        }
        if self.work_experience_in_profession_days.is_some_and(|d| d < 0) {
            return Err(AppError::validation("Work experience in profession cannot be negative"));
        }
        if self.working_hours.is_some_and(|h| h <= 0) {
            return Err(AppError::validation("Working hours must be positive"));
        }
        if let Some(card) = self.id_card_number.as_deref()
            && !card.trim().is_empty()
            && !is_digits(card, 9)
        {
            return Err(AppError::validation("ID card number must be 9 digits"));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_appointment() -> Appointment {
    Appointment {
        base: super::entry::sample_base("9501015678"),
        salary: Amount::from_cents(250_000),
        currency: Currency::Bgn,
        position: "Програмист".to_string(),
        work_experience_days: Some(1825),
        work_experience_in_profession_days: None,
        contract_date: NaiveDate::from_ymd_opt(2025, 1, 15),
        working_hours: Some(8),
        id_card_number: Some("123456789".to_string()),
        id_card_date: NaiveDate::from_ymd_opt(2020, 5, 10),
        id_card_authority: None,
        address: Some("гр. София, ул. Витоша 15".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entry;

    #[test]
    fn test_sample_is_valid() {
        assert!(sample_appointment().validate().is_ok());
    }

    #[test]
    fn test_salary_must_be_positive() {
        let mut a = sample_appointment();
        a.salary = Amount::from_cents(0);
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_id_card_number_rules() {
        let mut a = sample_appointment();
        a.id_card_number = Some("12345".to_string());
        assert!(a.validate().is_err());

        a.id_card_number = Some("   ".to_string());
        assert!(a.validate().is_ok());

        a.id_card_number = None;
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_working_hours_positive() {
        let mut a = sample_appointment();
        a.working_hours = Some(0);
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_deserialize_tagged_entry() {
        let json = r#"{
            "kind": "appointment",
            "entryDate": "2025-02-01",
            "consideredFromDate": "2025-02-01",
            "companyName": "БизнесКонсулт ЕООД",
            "IDN": "8803124567",
            "firstName": "Мария",
            "surname": "Георгиева",
            "salary": 1800.5,
            "position": "Счетоводител"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        let Entry::Appointment(a) = entry else {
            panic!("expected appointment");
        };
        assert_eq!(a.salary.cents(), 180_050);
        assert_eq!(a.currency, Currency::Eur);
        assert_eq!(a.base.id, 0);
        assert!(a.base.division.is_none());
    }
}

//! Dismissal entries.

use serde::{Deserialize, Serialize};

use super::EntryBase;
use crate::error::{AppError, Result};

fn default_article() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dismissal {
    #[serde(flatten)]
    pub base: EntryBase,
    /// Article of the Labour Code the dismissal is based on.
    #[serde(default = "default_article")]
    pub labour_code_article: i32,
    #[serde(default)]
    pub labour_code_paragraph: Option<i32>,
    #[serde(default)]
    pub labour_code_item: Option<i32>,
    /// Compensation under art. 224, in days.
    #[serde(default)]
    pub compensation_days: Option<i32>,
    #[serde(default)]
    pub garnishment: Option<bool>,
    #[serde(default)]
    pub leave_last_month_days: Option<i32>,
}

impl Dismissal {
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if self.labour_code_article <= 0 {
            return Err(AppError::validation("Labour code article must be greater than 0"));
        }
        if self.labour_code_paragraph.is_some_and(|p| p <= 0) {
            return Err(AppError::validation("Labour code paragraph must be greater than 0"));
        }
        if self.labour_code_item.is_some_and(|i| i <= 0) {
            return Err(AppError::validation("Labour code item must be greater than 0"));
        }
        Ok(())
    }

    /// `Чл.328, п.1, т.2` style reference.
    pub fn labour_code_reference(&self) -> String {
        let mut reference = format!("Чл.{}", self.labour_code_article);
        if let Some(paragraph) = self.labour_code_paragraph {
            reference.push_str(&format!(", п.{paragraph}"));
        }
        if let Some(item) = self.labour_code_item {
            reference.push_str(&format!(", т.{item}"));
        }
        reference
    }
}

#[cfg(test)]
pub(crate) fn sample_dismissal() -> Dismissal {
    let mut base = super::entry::sample_base("7801105432");
    base.company_name = "Старт АД".to_string();
    base.first_name = "Петър".to_string();
    base.surname = "Тодоров".to_string();
    Dismissal {
        base,
        labour_code_article: 328,
        labour_code_paragraph: Some(1),
        labour_code_item: Some(2),
        compensation_days: Some(30),
        garnishment: None,
        leave_last_month_days: None,
    }
}

//! Work experience stored as total days, shown as years / months / days.

/// Days in a year of service.
pub const DAYS_PER_YEAR: i32 = 365;
/// Days in a month of service.
pub const DAYS_PER_MONTH: i32 = 30;

/// Split of a day count into service years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Experience {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Experience {
    pub fn from_days(total: i32) -> Self {
        let remaining = total % DAYS_PER_YEAR;
        Self {
            years: total / DAYS_PER_YEAR,
            months: remaining / DAYS_PER_MONTH,
            days: remaining % DAYS_PER_MONTH,
        }
    }

    /// Total days, or `None` when no part was entered.
    pub fn to_days(years: Option<i32>, months: Option<i32>, days: Option<i32>) -> Option<i32> {
        if years.is_none() && months.is_none() && days.is_none() {
            return None;
        }
        Some(years.unwrap_or(0) * DAYS_PER_YEAR + months.unwrap_or(0) * DAYS_PER_MONTH + days.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_days() {
        assert_eq!(Experience::from_days(1825), Experience { years: 5, months: 0, days: 0 });
        assert_eq!(Experience::from_days(400), Experience { years: 1, months: 1, days: 5 });
        assert_eq!(Experience::from_days(29), Experience { years: 0, months: 0, days: 29 });
    }

    #[test]
    fn test_to_days() {
        assert_eq!(Experience::to_days(None, None, None), None);
        assert_eq!(Experience::to_days(Some(1), None, Some(5)), Some(370));
        assert_eq!(Experience::to_days(Some(8), Some(0), Some(0)), Some(2920));
    }
}

//! Applies a stored grid state (filters, sorts, paging, hidden columns) to the entry list.

use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::debug;

use crate::grid_state::{ColumnFilterState, EntryGridState, FilterValue, SortDirection};
use crate::models::Entry;

/// Columns of the entry list, in display order.
pub const COLUMNS: [&str; 9] = [
    "Id",
    "EntryType",
    "EntryDate",
    "ConsideredFromDate",
    "IsNRAConfirmed",
    "CompanyName",
    "Division",
    "IDN",
    "FullName",
];

/// Value of an entry property as seen by filters and sorts.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Date(NaiveDate),
    Text(String),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Decimal(_) => 2,
            Self::Date(_) => 3,
            Self::Text(_) => 4,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Text shown in list output.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => (if *b { "✓" } else { "" }).to_string(),
            Self::Int(i) => i.to_string(),
            Self::Decimal(d) => format!("{d:.2}"),
            Self::Date(d) => d.format("%d.%m.%Y").to_string(),
            Self::Text(t) => t.clone(),
        }
    }
}

fn text(value: &str) -> PropertyValue {
    PropertyValue::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> PropertyValue {
    value.map_or(PropertyValue::Null, text)
}

fn opt_int(value: Option<i32>) -> PropertyValue {
    value.map_or(PropertyValue::Null, |v| PropertyValue::Int(v.into()))
}

/// Look up a property by its PascalCase name. `None` means the property is unknown.
pub fn property(entry: &Entry, name: &str) -> Option<PropertyValue> {
    let base = entry.base();
    let value = match name {
        "Id" => PropertyValue::Int(base.id.into()),
        "EntryType" => PropertyValue::Int(entry.entry_type().code().into()),
        "EntryDate" => PropertyValue::Date(base.entry_date),
        "ConsideredFromDate" => PropertyValue::Date(base.considered_from_date),
        "IsNRAConfirmed" => PropertyValue::Bool(base.is_nra_confirmed),
        "CompanyName" => text(&base.company_name),
        "Division" => opt_text(base.division.as_deref()),
        "IDN" => text(&base.idn),
        "FirstName" => text(&base.first_name),
        "SecondName" => opt_text(base.second_name.as_deref()),
        "Surname" => text(&base.surname),
        "FullName" => PropertyValue::Text(base.full_name()),
        _ => match entry {
            Entry::Appointment(a) => match name {
                "Salary" => PropertyValue::Decimal(a.salary.as_f64()),
                "Currency" => text(a.currency.code()),
                "Position" => text(&a.position),
                "WorkingHours" => opt_int(a.working_hours),
                "ContractDate" => a.contract_date.map_or(PropertyValue::Null, PropertyValue::Date),
                "LabourCodeArticle" | "CompensationDays" | "Garnishment" | "LeaveLastMonthDays" => PropertyValue::Null,
                _ => return None,
            },
            Entry::Dismissal(d) => match name {
                "LabourCodeArticle" => PropertyValue::Int(d.labour_code_article.into()),
                "CompensationDays" => opt_int(d.compensation_days),
                "Garnishment" => d.garnishment.map_or(PropertyValue::Null, PropertyValue::Bool),
                "LeaveLastMonthDays" => opt_int(d.leave_last_month_days),
                "Salary" | "Currency" | "Position" | "WorkingHours" | "ContractDate" => PropertyValue::Null,
                _ => return None,
            },
        },
    };
    Some(value)
}

/// Ordering used for sorting: empty values first, text without regard to case.
pub fn compare(a: &PropertyValue, b: &PropertyValue) -> Ordering {
    match (a, b) {
        (PropertyValue::Bool(x), PropertyValue::Bool(y)) => x.cmp(y),
        (PropertyValue::Date(x), PropertyValue::Date(y)) => x.cmp(y),
        (PropertyValue::Text(x), PropertyValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.rank().cmp(&b.rank()),
        },
    }
}

/// Whether an entry passes a column filter. Filters on unknown properties or
/// with unknown operators are ignored.
pub fn matches(entry: &Entry, filter: &ColumnFilterState) -> bool {
    let Some(actual) = property(entry, &filter.property_name) else {
        debug!(property = %filter.property_name, "Ignoring filter on unknown property");
        return true;
    };
    let op = filter.operator.trim().to_lowercase();

    match op.as_str() {
        "is empty" => return is_blank(&actual),
        "is not empty" => return !is_blank(&actual),
        _ => {}
    }
    if filter.value == FilterValue::Null {
        return true;
    }

    let result = match &actual {
        PropertyValue::Null => Some(matches!(
            op.as_str(),
            "not contains" | "not equals" | "!=" | "is not"
        )),
        PropertyValue::Text(s) => match_text(s, &op, &filter.value.as_text()),
        PropertyValue::Int(_) | PropertyValue::Decimal(_) => match (actual.as_f64(), filter.value.as_f64()) {
            (Some(x), Some(y)) => match_number(x, &op, y),
            _ => Some(false),
        },
        PropertyValue::Date(d) => match filter.value.as_date() {
            Some(v) => match_date(*d, &op, v),
            None => Some(false),
        },
        PropertyValue::Bool(b) => match filter.value.as_bool() {
            Some(v) => match op.as_str() {
                "is" | "equals" | "=" => Some(*b == v),
                "is not" | "not equals" | "!=" => Some(*b != v),
                _ => None,
            },
            None => Some(false),
        },
    };

    result.unwrap_or_else(|| {
        debug!(operator = %filter.operator, property = %filter.property_name, "Ignoring filter with unknown operator");
        true
    })
}

fn is_blank(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Null => true,
        PropertyValue::Text(t) => t.trim().is_empty(),
        _ => false,
    }
}

fn match_text(actual: &str, op: &str, needle: &str) -> Option<bool> {
    let actual = actual.to_lowercase();
    let needle = needle.to_lowercase();
    Some(match op {
        "contains" => actual.contains(&needle),
        "not contains" => !actual.contains(&needle),
        "equals" | "=" => actual == needle,
        "not equals" | "!=" => actual != needle,
        "starts with" => actual.starts_with(&needle),
        "ends with" => actual.ends_with(&needle),
        _ => return None,
    })
}

fn match_number(actual: f64, op: &str, value: f64) -> Option<bool> {
    Some(match op {
        "=" | "equals" => actual == value,
        "!=" | "not equals" => actual != value,
        ">" => actual > value,
        ">=" => actual >= value,
        "<" => actual < value,
        "<=" => actual <= value,
        _ => return None,
    })
}

fn match_date(actual: NaiveDate, op: &str, value: NaiveDate) -> Option<bool> {
    Some(match op {
        "is" | "=" => actual == value,
        "is not" | "!=" => actual != value,
        "is after" | ">" => actual > value,
        "is on or after" | ">=" => actual >= value,
        "is before" | "<" => actual < value,
        "is on or before" | "<=" => actual <= value,
        _ => return None,
    })
}

/// One page of the entry list.
#[derive(Debug, Clone)]
pub struct GridPage {
    pub items: Vec<Entry>,
    /// Entries matching the filters, across all pages.
    pub total: usize,
    /// Effective page index after clamping.
    pub page_index: usize,
    /// Zero means everything on one page.
    pub page_size: usize,
    pub page_count: usize,
    pub hidden_columns: Vec<String>,
}

impl GridPage {
    /// Columns not hidden by the state, in display order.
    pub fn visible_columns(&self) -> Vec<&'static str> {
        COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.hidden_columns.iter().any(|h| h == c))
            .collect()
    }
}

/// Quick search over name, IDN and company, as typed in the list's search box.
pub fn matches_search(entry: &Entry, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let base = entry.base();
    [base.full_name(), base.idn.clone(), base.company_name.clone()]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Filter, sort and page `entries` according to `state`. The input order is
/// kept between entries that compare equal.
pub fn apply(entries: Vec<Entry>, state: &EntryGridState, search: Option<&str>) -> GridPage {
    let mut rows: Vec<Entry> = entries
        .into_iter()
        .filter(|e| search.is_none_or(|s| matches_search(e, s)))
        .filter(|e| state.filters.iter().all(|f| matches(e, f)))
        .collect();

    let mut sorts: Vec<_> = state
        .sorts
        .iter()
        .filter(|s| s.direction != SortDirection::None)
        .collect();
    sorts.sort_by_key(|s| s.index);

    if !sorts.is_empty() {
        rows.sort_by(|a, b| {
            sorts
                .iter()
                .map(|s| {
                    let ordering = match (property(a, &s.property_name), property(b, &s.property_name)) {
                        (Some(x), Some(y)) => compare(&x, &y),
                        _ => Ordering::Equal,
                    };
                    if s.direction == SortDirection::Descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    let total = rows.len();
    let page_size = usize::try_from(state.page_size).unwrap_or(0);
    let (items, page_index, page_count) = if page_size == 0 {
        (rows, 0, 1)
    } else {
        let page_count = total.div_ceil(page_size).max(1);
        let page_index = usize::try_from(state.page_index).unwrap_or(0).min(page_count - 1);
        let items = rows.into_iter().skip(page_index * page_size).take(page_size).collect();
        (items, page_index, page_count)
    };

    GridPage {
        items,
        total,
        page_index,
        page_size,
        page_count,
        hidden_columns: state.hidden_columns.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_state::ColumnSortState;
    use crate::models::appointment::sample_appointment;
    use crate::models::dismissal::sample_dismissal;

    fn entries() -> Vec<Entry> {
        let mut a1 = sample_appointment();
        a1.base.id = 1;
        a1.base.company_name = "Бета ООД".to_string();
        a1.base.entry_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let mut d2 = sample_dismissal();
        d2.base.id = 2;
        d2.base.company_name = "алфа АД".to_string();
        d2.base.division = Some("Склад".to_string());
        d2.base.entry_date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

        let mut a3 = sample_appointment();
        a3.base.id = 3;
        a3.base.company_name = "Гама ЕООД".to_string();
        a3.base.is_nra_confirmed = true;
        a3.base.entry_date = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();

        vec![a3.into(), d2.into(), a1.into()]
    }

    fn filter(property: &str, operator: &str, value: FilterValue) -> ColumnFilterState {
        ColumnFilterState {
            property_name: property.to_string(),
            operator: operator.to_string(),
            value,
        }
    }

    fn ids(page: &GridPage) -> Vec<i32> {
        page.items.iter().map(Entry::id).collect()
    }

    fn all_on_one_page() -> EntryGridState {
        EntryGridState {
            page_size: 0,
            ..EntryGridState::default()
        }
    }

    #[test]
    fn test_no_state_keeps_order() {
        let page = apply(entries(), &all_on_one_page(), None);
        assert_eq!(ids(&page), vec![3, 2, 1]);
        assert_eq!(page.total, 3);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn test_text_filters_ignore_case() {
        let mut state = all_on_one_page();
        state.filters.push(filter("CompanyName", "starts with", FilterValue::Text("АЛФА".to_string())));
        assert_eq!(ids(&apply(entries(), &state, None)), vec![2]);

        state.filters = vec![filter("CompanyName", "contains", FilterValue::Text("ООД".to_string()))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3, 1]);
    }

    #[test]
    fn test_empty_and_null_filters() {
        let mut state = all_on_one_page();
        state.filters.push(filter("Division", "is not empty", FilterValue::Null));
        assert_eq!(ids(&apply(entries(), &state, None)), vec![2]);

        state.filters = vec![filter("CompanyName", "contains", FilterValue::Null)];
        assert_eq!(apply(entries(), &state, None).total, 3);

        state.filters = vec![filter("Division", "not equals", FilterValue::Text("Склад".to_string()))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3, 1]);
    }

    #[test]
    fn test_date_number_and_bool_filters() {
        let mut state = all_on_one_page();
        state.filters.push(filter("EntryDate", "is on or after", FilterValue::from_text("2025-02-05T00:00:00")));
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3, 1]);

        state.filters = vec![filter("Id", ">", FilterValue::Integer(1))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3, 2]);

        state.filters = vec![filter("IsNRAConfirmed", "is", FilterValue::Bool(true))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3]);

        state.filters = vec![filter("Salary", ">=", FilterValue::Decimal(2500.0))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3, 1]);
    }

    #[test]
    fn test_filters_typed_as_text() {
        let mut state = all_on_one_page();
        state.filters.push(filter("IsNRAConfirmed", "is", FilterValue::from_text("true")));
        assert_eq!(ids(&apply(entries(), &state, None)), vec![3]);

        state.filters = vec![filter("IsNRAConfirmed", "is", FilterValue::Text("False".to_string()))];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![2, 1]);

        state.filters = vec![filter("IsNRAConfirmed", "is", FilterValue::from_text("maybe"))];
        assert_eq!(apply(entries(), &state, None).total, 0);

        let mut list = entries();
        if let Entry::Appointment(a) = &mut list[2] {
            a.base.company_name = "Склад 2025-01-01 ООД".to_string();
        }
        state.filters = vec![filter("CompanyName", "contains", FilterValue::from_text("2025-01-01"))];
        assert_eq!(ids(&apply(list, &state, None)), vec![1]);
    }

    #[test]
    fn test_unknown_property_or_operator_is_ignored() {
        let mut state = all_on_one_page();
        state.filters.push(filter("Nickname", "contains", FilterValue::Text("x".to_string())));
        state.filters.push(filter("CompanyName", "sounds like", FilterValue::Text("x".to_string())));
        assert_eq!(apply(entries(), &state, None).total, 3);
    }

    #[test]
    fn test_multi_column_sort_by_index() {
        let mut state = all_on_one_page();
        state.sorts = vec![
            ColumnSortState {
                property_name: "EntryDate".to_string(),
                direction: SortDirection::Descending,
                index: 1,
            },
            ColumnSortState {
                property_name: "EntryType".to_string(),
                direction: SortDirection::Ascending,
                index: 0,
            },
        ];
        assert_eq!(ids(&apply(entries(), &state, None)), vec![1, 3, 2]);

        state.sorts = vec![ColumnSortState {
            property_name: "CompanyName".to_string(),
            direction: SortDirection::Ascending,
            index: 0,
        }];
        // Lower-case "алфа" still sorts before "Бета".
        assert_eq!(ids(&apply(entries(), &state, None)), vec![2, 1, 3]);
    }

    #[test]
    fn test_paging_clamps_index() {
        let state = EntryGridState {
            page_size: 2,
            page_index: 5,
            ..EntryGridState::default()
        };
        let page = apply(entries(), &state, None);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.page_index, 1);
        assert_eq!(ids(&page), vec![1]);
    }

    #[test]
    fn test_search_and_visible_columns() {
        let state = EntryGridState {
            page_size: 0,
            hidden_columns: vec!["Division".to_string(), "IDN".to_string()],
            ..EntryGridState::default()
        };
        let page = apply(entries(), &state, Some("гама"));
        assert_eq!(ids(&page), vec![3]);
        let columns = page.visible_columns();
        assert!(!columns.contains(&"IDN"));
        assert!(columns.contains(&"FullName"));
    }

    #[test]
    fn test_kind_specific_properties() {
        let all = entries();
        assert_eq!(property(&all[1], "Salary"), Some(PropertyValue::Null));
        assert_eq!(property(&all[1], "LabourCodeArticle"), Some(PropertyValue::Int(328)));
        assert_eq!(property(&all[0], "Position"), Some(PropertyValue::Text("Програмист".to_string())));
        assert_eq!(property(&all[0], "Nickname"), None);
    }
}

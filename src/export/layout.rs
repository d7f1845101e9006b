//! Cell layout of the entry blocks in the export workbook.
//!
//! Every entry becomes a block of labelled cells in columns A to E. Blocks are
//! stacked top to bottom with two empty rows between them.

use chrono::NaiveDate;

use crate::models::{Amount, Appointment, Currency, Dismissal, Entry, EntryBase, EntryType, Experience};

/// Empty rows between two entry blocks.
pub const BLOCK_GAP: u32 = 2;

/// Placeholder for values that were not entered.
pub const MISSING: &str = "NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Block title: bold red, no border.
    Title,
    /// Bold with a thin border.
    Bold,
    /// Thin border only.
    Plain,
}

/// A value placed in one row, spanning `first_col..=last_col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn is_merged(&self) -> bool {
        self.first_col != self.last_col
    }
}

/// Collects the cells of one block.
struct Block<'a> {
    cells: &'a mut Vec<Cell>,
    row: u32,
}

impl Block<'_> {
    fn put(&mut self, col: u16, text: impl Into<String>, style: CellStyle) {
        self.span(col, col, text, style);
    }

    fn span(&mut self, first_col: u16, last_col: u16, text: impl Into<String>, style: CellStyle) {
        self.cells.push(Cell {
            row: self.row,
            first_col,
            last_col,
            text: text.into(),
            style,
        });
    }

    fn next_row(&mut self) {
        self.row += 1;
    }

    /// Title, company/division and IDN/name rows shared by both entry kinds.
    fn header(&mut self, title: &str, base: &EntryBase) {
        self.put(0, title, CellStyle::Title);
        self.next_row();

        self.put(0, base.company_name.as_str(), CellStyle::Bold);
        self.put(1, base.division.clone().unwrap_or_default(), CellStyle::Plain);
        self.next_row();

        self.put(0, base.idn.as_str(), CellStyle::Bold);
        self.put(1, base.full_name(), CellStyle::Bold);
        self.next_row();
    }
}

/// Lay out all entries, starting at the first row.
pub fn layout(entries: &[Entry]) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut row = 0;
    for entry in entries {
        row = match entry {
            Entry::Appointment(a) => appointment_block(&mut cells, a, row),
            Entry::Dismissal(d) => dismissal_block(&mut cells, d, row),
        } + BLOCK_GAP;
    }
    cells
}

/// Returns the row after the block.
fn appointment_block(cells: &mut Vec<Cell>, a: &Appointment, start_row: u32) -> u32 {
    let mut block = Block { cells, row: start_row };
    block.header(EntryType::Appointment.title_bg(), &a.base);

    block.put(0, format_salary(a.salary, a.currency), CellStyle::Bold);
    block.put(1, format!("ДЛЪЖНОСТ - {}", a.position), CellStyle::Bold);
    block.span(2, 4, format_experience("ТРУДОВ СТАЖ ОБЩ", a.work_experience_days), CellStyle::Plain);
    block.next_row();

    block.span(
        2,
        4,
        format_experience("ТРУДОВ СТАЖ ПРОФЕСИЯ", a.work_experience_in_profession_days),
        CellStyle::Plain,
    );
    block.next_row();

    block.put(
        0,
        format!("СЧИТАНО ОТ ДАТА - {}", format_date(Some(a.base.entry_date))),
        CellStyle::Bold,
    );
    block.put(
        1,
        format!("ДАТА НА ДОГОВОР - {}", format_date(Some(a.base.considered_from_date))),
        CellStyle::Plain,
    );
    block.span(2, 4, format!("часове работен ден - {}", format_int(a.working_hours)), CellStyle::Plain);
    block.next_row();

    block.put(0, format!("ЛК № - {}", format_text(a.id_card_number.as_deref())), CellStyle::Plain);
    block.put(1, format!("ДАТА НА ИЗДАВАНЕ - {}", format_date(a.id_card_date)), CellStyle::Plain);
    block.span(
        2,
        4,
        format!("ИЗДАДЕН ОТ - {}", format_text(a.id_card_authority.as_deref())),
        CellStyle::Plain,
    );
    block.next_row();

    block.span(0, 4, format!("АДРЕС - {}", format_text(a.address.as_deref())), CellStyle::Plain);
    block.next_row();

    block.row
}

/// Returns the row after the block.
fn dismissal_block(cells: &mut Vec<Cell>, d: &Dismissal, start_row: u32) -> u32 {
    let mut block = Block { cells, row: start_row };
    block.header(EntryType::Dismissal.title_bg(), &d.base);

    block.put(
        0,
        format!("СЧИТАНО ОТ ДАТА - {}", format_date(Some(d.base.entry_date))),
        CellStyle::Bold,
    );
    block.next_row();

    block.put(0, format!("ЧЛЕН ОТ КТ - {}", d.labour_code_reference()), CellStyle::Plain);
    block.span(
        1,
        2,
        // Missing compensation leaves the number out instead of printing NULL.
        format!(
            "ОБЕЗЩЕТЕНИЕ ПО ЧЛ.224 - {} ДНИ",
            d.compensation_days.map(|v| v.to_string()).unwrap_or_default()
        ),
        CellStyle::Plain,
    );
    block.next_row();

    block.put(0, format_garnishment(d.garnishment), CellStyle::Plain);
    block.span(
        1,
        2,
        format!("ОТПУСК ПОСЛЕДЕН МЕСЕЦ - {}", format_int(d.leave_last_month_days)),
        CellStyle::Plain,
    );
    block.next_row();

    block.row
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| MISSING.to_string(), |d| d.format("%d.%m.%Y").to_string())
}

pub fn format_int(value: Option<i32>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn format_text(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

pub fn format_salary(salary: Amount, currency: Currency) -> String {
    format!("ЗАПЛАТА - {salary} {currency}")
}

/// `ТРУДОВ СТАЖ ОБЩ - 5 години / 0 месеци / 0 дни`, or the bare labels when no experience was entered.
pub fn format_experience(label: &str, days: Option<i32>) -> String {
    match days.filter(|d| *d != 0) {
        None => format!("{label} години / месеци / дни"),
        Some(days) => {
            let e = Experience::from_days(days);
            format!("{label} - {} години / {} месеци / {} дни", e.years, e.months, e.days)
        }
    }
}

pub fn format_garnishment(garnishment: Option<bool>) -> &'static str {
    match garnishment {
        Some(true) => "ДА",
        Some(false) => "НЕ",
        None => MISSING,
    }
}

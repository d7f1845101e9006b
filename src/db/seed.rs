//! Sample register data for demos and manual testing.

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::info;

use super::{appointment, dismissal};
use crate::entities::prelude::*;
use crate::error::Result;
use crate::models::{Amount, Appointment, Currency, Dismissal, EntryBase};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn base(
    entry_date: NaiveDate,
    nra: bool,
    company: &str,
    division: Option<&str>,
    idn: &str,
    names: (&str, Option<&str>, &str),
) -> EntryBase {
    EntryBase {
        id: 0,
        entry_date,
        considered_from_date: entry_date,
        is_nra_confirmed: nra,
        company_name: company.to_string(),
        division: division.map(str::to_string),
        idn: idn.to_string(),
        first_name: names.0.to_string(),
        second_name: names.1.map(str::to_string),
        surname: names.2.to_string(),
    }
}

fn appointment(base: EntryBase, salary_cents: i64, position: &str) -> Appointment {
    Appointment {
        contract_date: Some(base.entry_date),
        base,
        salary: Amount::from_cents(salary_cents),
        currency: Currency::Bgn,
        position: position.to_string(),
        work_experience_days: None,
        work_experience_in_profession_days: None,
        working_hours: Some(8),
        id_card_number: None,
        id_card_date: None,
        id_card_authority: None,
        address: None,
    }
}

fn dismissal(base: EntryBase, article: i32, paragraph: Option<i32>, item: Option<i32>) -> Dismissal {
    Dismissal {
        base,
        labour_code_article: article,
        labour_code_paragraph: paragraph,
        labour_code_item: item,
        compensation_days: None,
        garnishment: None,
        leave_last_month_days: None,
    }
}

fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            work_experience_days: Some(1825),
            id_card_number: Some("123456789".to_string()),
            id_card_date: Some(date(2020, 5, 10)),
            address: Some("гр. София, ул. Витоша 15".to_string()),
            ..appointment(
                base(date(2025, 1, 15), true, "ТехноСофт ООД", Some("ИТ Отдел"), "9501015678", ("Иван", Some("Петров"), "Иванов")),
                250_000,
                "Програмист",
            )
        },
        appointment(
            base(date(2025, 2, 1), false, "БизнесКонсулт ЕООД", None, "8803124567", ("Мария", None, "Георгиева")),
            180_050,
            "Счетоводител",
        ),
        Appointment {
            work_experience_days: Some(3650),
            work_experience_in_profession_days: Some(2920),
            address: Some("гр. Пловдив, бул. Марица 45".to_string()),
            ..appointment(
                base(date(2025, 3, 10), true, "Строй Инженеринг АД", Some("Проектиране"), "9205203456", ("Георги", Some("Стоянов"), "Димитров")),
                320_000,
                "Главен инженер",
            )
        },
        Appointment {
            working_hours: Some(12),
            id_card_number: Some("987654321".to_string()),
            id_card_date: Some(date(2022, 3, 15)),
            ..appointment(
                base(date(2025, 4, 5), true, "МедиЦентър ЕООД", None, "9709155234", ("Елена", None, "Петкова")),
                220_000,
                "Медицинска сестра",
            )
        },
        Appointment {
            work_experience_days: Some(2555),
            ..appointment(
                base(date(2025, 5, 20), false, "Образование Плюс ООД", Some("Начално образование"), "8512254321", ("Стоян", Some("Николов"), "Христов")),
                195_000,
                "Учител",
            )
        },
    ]
}

fn sample_dismissals() -> Vec<Dismissal> {
    vec![
        Dismissal {
            compensation_days: Some(30),
            ..dismissal(
                base(date(2025, 1, 31), true, "Старт АД", None, "7801105432", ("Петър", None, "Тодоров")),
                328,
                Some(1),
                Some(2),
            )
        },
        Dismissal {
            garnishment: Some(false),
            leave_last_month_days: Some(5),
            ..dismissal(
                base(date(2025, 2, 15), true, "Търговия ЕООД", Some("Склад"), "9203254567", ("Анна", Some("Василева"), "Стоянова")),
                325,
                Some(1),
                Some(1),
            )
        },
        Dismissal {
            compensation_days: Some(0),
            garnishment: Some(true),
            ..dismissal(
                base(date(2025, 3, 20), false, "ПродуктиКо ООД", None, "8608123456", ("Николай", None, "Александров")),
                330,
                Some(2),
                Some(6),
            )
        },
        Dismissal {
            compensation_days: Some(15),
            leave_last_month_days: Some(2),
            ..dismissal(
                base(date(2025, 4, 10), true, "Логистик Експрес АД", Some("Транспорт"), "9012305678", ("Димитър", Some("Христов"), "Йорданов")),
                327,
                Some(1),
                None,
            )
        },
        Dismissal {
            compensation_days: Some(60),
            garnishment: Some(false),
            leave_last_month_days: Some(10),
            ..dismissal(
                base(date(2025, 5, 1), false, "Финанси Консулт ООД", None, "8907156789", ("Светлана", None, "Иванова")),
                328,
                Some(1),
                Some(11),
            )
        },
    ]
}

/// Insert sample appointments and dismissals into an empty register.
///
/// Returns the number of inserted entries (0 when the register already has data).
pub async fn seed_test_data(db: &DatabaseConnection) -> Result<usize> {
    if Entries::find().count(db).await? > 0 {
        info!("Register already has entries, skipping seed data");
        return Ok(0);
    }

    let mut inserted = 0;
    for a in sample_appointments() {
        appointment::create(db, a).await?;
        inserted += 1;
    }
    for d in sample_dismissals() {
        dismissal::create(db, d).await?;
        inserted += 1;
    }

    info!("Seeded {inserted} sample entries");
    Ok(inserted)
}

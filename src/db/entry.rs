//! Repository operations spanning both entry kinds.

use chrono::NaiveDate;
use sea_orm::*;
use std::collections::HashMap;
use tracing::{error, info, warn};

use super::{appointment, dismissal};
use crate::entities::{appointments, dismissals, entries, prelude::*};
use crate::error::{AppError, Result};
use crate::models::{Entry, EntryBase, EntryType};

/// List every entry, newest first.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Entry>> {
    let bases = Entries::find()
        .order_by_desc(entries::Column::Id)
        .all(db)
        .await
        .inspect_err(|e| error!("Failed to retrieve all entries: {e}"))?;

    materialize(db, bases).await
}

/// Get a single entry of either kind.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Entry>> {
    let Some(base) = Entries::find_by_id(id)
        .one(db)
        .await
        .inspect_err(|e| error!(entry_id = id, "Failed to retrieve entry: {e}"))?
    else {
        return Ok(None);
    };

    Ok(materialize(db, vec![base]).await?.pop())
}

/// Like [`get_by_id`], but a missing entry is an [`AppError::NotFound`].
pub async fn require(db: &DatabaseConnection, id: i32) -> Result<Entry> {
    get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("entry {id}")))
}

/// Entries whose entry date lies in `start..=end`, optionally for one company,
/// ordered by entry date.
pub async fn list_for_export(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
    company: Option<&str>,
) -> Result<Vec<Entry>> {
    let mut query = Entries::find().filter(entries::Column::EntryDate.between(start, end));

    if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
        query = query.filter(entries::Column::CompanyName.eq(company));
    }

    let bases = query
        .order_by_asc(entries::Column::EntryDate)
        .order_by_asc(entries::Column::Id)
        .all(db)
        .await
        .inspect_err(|e| error!("Failed to retrieve entries for export: {e}"))?;

    materialize(db, bases).await
}

/// Store a new entry of either kind.
pub async fn create(db: &DatabaseConnection, entry: Entry) -> Result<Entry> {
    match entry {
        Entry::Appointment(a) => appointment::create(db, a).await.map(Entry::from),
        Entry::Dismissal(d) => dismissal::create(db, d).await.map(Entry::from),
    }
}

/// Replace a stored entry. The stored kind must match.
pub async fn update(db: &DatabaseConnection, id: i32, entry: Entry) -> Result<Option<Entry>> {
    match entry {
        Entry::Appointment(a) => Ok(appointment::update(db, id, a).await?.map(Entry::from)),
        Entry::Dismissal(d) => Ok(dismissal::update(db, id, d).await?.map(Entry::from)),
    }
}

/// Delete an entry of any kind.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
    delete_where(db, id, None).await
}

/// Delete an entry, optionally only when it has the given kind.
pub(crate) async fn delete_where(db: &DatabaseConnection, id: i32, kind: Option<EntryType>) -> Result<bool> {
    let result = async {
        let mut query = Entries::find_by_id(id);
        if let Some(kind) = kind {
            query = query.filter(entries::Column::EntryType.eq(kind.code()));
        }
        if query.one(db).await?.is_none() {
            return Ok(false);
        }

        let txn = db.begin().await?;
        Appointments::delete_by_id(id).exec(&txn).await?;
        Dismissals::delete_by_id(id).exec(&txn).await?;
        let removed = Entries::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok::<_, DbErr>(removed.rows_affected > 0)
    }
    .await
    .inspect_err(|e| error!(entry_id = id, "Failed to delete entry: {e}"))?;

    if result {
        info!(entry_id = id, "Entry deleted");
    }
    Ok(result)
}

/// Join base rows with their subtype rows, keeping the input order.
async fn materialize(db: &DatabaseConnection, bases: Vec<entries::Model>) -> Result<Vec<Entry>> {
    if bases.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = bases.iter().map(|b| b.id).collect();

    let mut appointments: HashMap<i32, appointments::Model> = Appointments::find()
        .filter(appointments::Column::EntryId.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.entry_id, m))
        .collect();
    let mut dismissals: HashMap<i32, dismissals::Model> = Dismissals::find()
        .filter(dismissals::Column::EntryId.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.entry_id, m))
        .collect();

    let mut result = Vec::with_capacity(bases.len());
    for base in bases {
        let entry = match EntryType::from_code(base.entry_type) {
            Some(EntryType::Appointment) => match appointments.remove(&base.id) {
                Some(detail) => Entry::from(appointment::from_models(base, detail)?),
                None => {
                    warn!(entry_id = base.id, "Appointment details missing, skipping entry");
                    continue;
                }
            },
            Some(EntryType::Dismissal) => match dismissals.remove(&base.id) {
                Some(detail) => Entry::from(dismissal::from_models(base, detail)),
                None => {
                    warn!(entry_id = base.id, "Dismissal details missing, skipping entry");
                    continue;
                }
            },
            None => {
                warn!(entry_id = base.id, code = base.entry_type, "Unknown entry type, skipping entry");
                continue;
            }
        };
        result.push(entry);
    }
    Ok(result)
}

/// Build the base part of an entry from its row.
pub(crate) fn base_from_model(model: entries::Model) -> EntryBase {
    EntryBase {
        id: model.id,
        entry_date: model.entry_date,
        considered_from_date: model.considered_from_date,
        is_nra_confirmed: model.is_nra_confirmed,
        company_name: model.company_name,
        division: model.division,
        idn: model.idn,
        first_name: model.first_name,
        second_name: model.second_name,
        surname: model.surname,
    }
}

/// Copy the editable base fields onto an active model.
pub(crate) fn apply_base(active: &mut entries::ActiveModel, base: &EntryBase) {
    active.entry_date = Set(base.entry_date);
    active.considered_from_date = Set(base.considered_from_date);
    active.is_nra_confirmed = Set(base.is_nra_confirmed);
    active.company_name = Set(base.company_name.trim().to_string());
    active.division = Set(non_blank(&base.division));
    active.idn = Set(base.idn.trim().to_string());
    active.first_name = Set(base.first_name.trim().to_string());
    active.second_name = Set(non_blank(&base.second_name));
    active.surname = Set(base.surname.trim().to_string());
}

/// Fresh active model for an entry of the given kind.
pub(crate) fn new_base(kind: EntryType, base: &EntryBase) -> entries::ActiveModel {
    let mut active = entries::ActiveModel {
        entry_type: Set(kind.code()),
        ..Default::default()
    };
    apply_base(&mut active, base);
    active
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, ensure_created};
    use crate::models::appointment::sample_appointment;
    use crate::models::dismissal::sample_dismissal;

    async fn test_db() -> DatabaseConnection {
        let db = connect("sqlite::memory:").await.unwrap();
        ensure_created(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_list_all_mixes_kinds_newest_first() {
        let db = test_db().await;
        let a = create(&db, sample_appointment().into()).await.unwrap();
        let d = create(&db, sample_dismissal().into()).await.unwrap();

        let all = list_all(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), d.id());
        assert_eq!(all[0].entry_type(), EntryType::Dismissal);
        assert_eq!(all[1].id(), a.id());
        assert_eq!(all[1], a);
    }

    #[tokio::test]
    async fn test_delete_removes_details() {
        let db = test_db().await;
        let a = create(&db, sample_appointment().into()).await.unwrap();

        assert!(delete(&db, a.id()).await.unwrap());
        assert!(!delete(&db, a.id()).await.unwrap());
        assert!(get_by_id(&db, a.id()).await.unwrap().is_none());
        assert_eq!(Appointments::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_require_missing_entry_is_not_found() {
        let db = test_db().await;
        let d = create(&db, sample_dismissal().into()).await.unwrap();

        assert_eq!(require(&db, d.id()).await.unwrap(), d);

        let err = require(&db, d.id() + 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), format!("Not found: entry {}", d.id() + 1));
    }

    #[tokio::test]
    async fn test_list_for_export_filters_range_and_company() {
        let db = test_db().await;

        let mut early = sample_dismissal();
        early.base.entry_date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let mut late = sample_dismissal();
        late.base.entry_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut other = sample_appointment();
        other.base.entry_date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        other.base.company_name = "Друга ООД".to_string();

        for entry in [Entry::from(late), Entry::from(early), Entry::from(other)] {
            create(&db, entry).await.unwrap();
        }

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();

        let all = list_for_export(&db, start, end, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].base().entry_date < all[1].base().entry_date);

        let only = list_for_export(&db, start, end, Some("Друга ООД")).await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].entry_type(), EntryType::Appointment);

        let blank = list_for_export(&db, start, end, Some("  ")).await.unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  ".to_string())), None);
        assert_eq!(non_blank(&Some(" Склад ".to_string())), Some("Склад".to_string()));
        assert_eq!(non_blank(&None), None);
    }
}

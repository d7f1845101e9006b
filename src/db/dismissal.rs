//! Dismissal repository with CRUD operations.

use sea_orm::*;
use tracing::{error, info};

use super::entry::{apply_base, base_from_model, delete_where, new_base};
use crate::entities::{dismissals, entries, prelude::*};
use crate::error::Result;
use crate::models::{Dismissal, EntryType};

/// List all dismissals, newest first.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Dismissal>> {
    let rows = Entries::find()
        .find_also_related(Dismissals)
        .filter(entries::Column::EntryType.eq(EntryType::Dismissal.code()))
        .order_by_desc(entries::Column::Id)
        .all(db)
        .await
        .inspect_err(|e| error!("Failed to retrieve dismissals: {e}"))?;

    Ok(rows
        .into_iter()
        .filter_map(|(base, detail)| detail.map(|detail| from_models(base, detail)))
        .collect())
}

/// Get dismissal by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Dismissal>> {
    let row = find_row(db, id)
        .await
        .inspect_err(|e| error!(dismissal_id = id, "Failed to retrieve dismissal: {e}"))?;

    Ok(row.map(|(base, detail)| from_models(base, detail)))
}

/// Create a new dismissal.
pub async fn create(db: &DatabaseConnection, data: Dismissal) -> Result<Dismissal> {
    data.validate()?;

    let (base, detail) = async {
        let txn = db.begin().await?;
        let base = new_base(EntryType::Dismissal, &data.base).insert(&txn).await?;

        let mut detail = dismissals::ActiveModel {
            entry_id: Set(base.id),
            ..Default::default()
        };
        apply_detail(&mut detail, &data);
        let detail = detail.insert(&txn).await?;

        txn.commit().await?;
        Ok::<_, DbErr>((base, detail))
    }
    .await
    .inspect_err(|e| {
        error!(
            "Failed to add dismissal for {} {}: {e}",
            data.base.first_name, data.base.surname
        )
    })?;

    info!(dismissal_id = base.id, "Dismissal created");
    Ok(from_models(base, detail))
}

/// Update an existing dismissal. Returns `None` when no dismissal has this ID.
pub async fn update(db: &DatabaseConnection, id: i32, data: Dismissal) -> Result<Option<Dismissal>> {
    data.validate()?;

    let Some((base, detail)) = find_row(db, id).await? else {
        return Ok(None);
    };

    let (base, detail) = async {
        let txn = db.begin().await?;

        let mut base: entries::ActiveModel = base.into();
        apply_base(&mut base, &data.base);
        let base = base.update(&txn).await?;

        let mut detail: dismissals::ActiveModel = detail.into();
        apply_detail(&mut detail, &data);
        let detail = detail.update(&txn).await?;

        txn.commit().await?;
        Ok::<_, DbErr>((base, detail))
    }
    .await
    .inspect_err(|e| error!(dismissal_id = id, "Failed to update dismissal: {e}"))?;

    info!(dismissal_id = id, "Dismissal updated");
    Ok(Some(from_models(base, detail)))
}

/// Delete a dismissal by ID.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
    delete_where(db, id, Some(EntryType::Dismissal)).await
}

async fn find_row(db: &DatabaseConnection, id: i32) -> std::result::Result<Option<(entries::Model, dismissals::Model)>, DbErr> {
    let row = Entries::find_by_id(id)
        .find_also_related(Dismissals)
        .filter(entries::Column::EntryType.eq(EntryType::Dismissal.code()))
        .one(db)
        .await?;

    Ok(row.and_then(|(base, detail)| detail.map(|detail| (base, detail))))
}

fn apply_detail(active: &mut dismissals::ActiveModel, data: &Dismissal) {
    active.labour_code_article = Set(data.labour_code_article);
    active.labour_code_paragraph = Set(data.labour_code_paragraph);
    active.labour_code_item = Set(data.labour_code_item);
    active.compensation_days = Set(data.compensation_days);
    active.garnishment = Set(data.garnishment);
    active.leave_last_month_days = Set(data.leave_last_month_days);
}

/// Assemble a dismissal from its base and detail rows.
pub(crate) fn from_models(base: entries::Model, detail: dismissals::Model) -> Dismissal {
    Dismissal {
        base: base_from_model(base),
        labour_code_article: detail.labour_code_article,
        labour_code_paragraph: detail.labour_code_paragraph,
        labour_code_item: detail.labour_code_item,
        compensation_days: detail.compensation_days,
        garnishment: detail.garnishment,
        leave_last_month_days: detail.leave_last_month_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, ensure_created};
    use crate::models::dismissal::sample_dismissal;

    async fn test_db() -> DatabaseConnection {
        let db = connect("sqlite::memory:").await.unwrap();
        ensure_created(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let db = test_db().await;
        let created = create(&db, sample_dismissal()).await.unwrap();
        assert_eq!(get_by_id(&db, created.base.id).await.unwrap(), Some(created.clone()));

        let mut changed = created.clone();
        changed.garnishment = Some(true);
        changed.labour_code_item = None;
        let updated = update(&db, created.base.id, changed).await.unwrap().unwrap();
        assert_eq!(updated.garnishment, Some(true));
        assert_eq!(updated.labour_code_reference(), "Чл.328, п.1");

        assert!(delete(&db, created.base.id).await.unwrap());
        assert!(get_by_id(&db, created.base.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_article_not_stored() {
        let db = test_db().await;
        let mut bad = sample_dismissal();
        bad.labour_code_item = Some(-1);
        assert!(create(&db, bad).await.is_err());
        assert!(list_all(&db).await.unwrap().is_empty());
    }
}

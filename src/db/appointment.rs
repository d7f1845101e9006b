//! Appointment repository with CRUD operations.

use sea_orm::*;
use tracing::{error, info};

use super::entry::{base_from_model, delete_where, new_base, non_blank};
use crate::entities::{appointments, entries, prelude::*};
use crate::error::Result;
use crate::models::{Amount, Appointment, EntryType};

/// List all appointments, newest first.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Appointment>> {
    let rows = Entries::find()
        .find_also_related(Appointments)
        .filter(entries::Column::EntryType.eq(EntryType::Appointment.code()))
        .order_by_desc(entries::Column::Id)
        .all(db)
        .await
        .inspect_err(|e| error!("Failed to retrieve appointments: {e}"))?;

    rows.into_iter()
        .filter_map(|(base, detail)| detail.map(|detail| from_models(base, detail)))
        .collect()
}

/// Get appointment by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Appointment>> {
    let row = find_row(db, id)
        .await
        .inspect_err(|e| error!(appointment_id = id, "Failed to retrieve appointment: {e}"))?;

    row.map(|(base, detail)| from_models(base, detail)).transpose()
}

/// Create a new appointment.
pub async fn create(db: &DatabaseConnection, data: Appointment) -> Result<Appointment> {
    data.validate()?;

    let (base, detail) = async {
        let txn = db.begin().await?;
        let base = new_base(EntryType::Appointment, &data.base).insert(&txn).await?;

        let mut detail = appointments::ActiveModel {
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
            "Failed to add appointment for {} {}: {e}",
            data.base.first_name, data.base.surname
        )
    })?;

    info!(appointment_id = base.id, "Appointment created");
    from_models(base, detail)
}

/// Update an existing appointment. Returns `None` when no appointment has this ID.
pub async fn update(db: &DatabaseConnection, id: i32, data: Appointment) -> Result<Option<Appointment>> {
    data.validate()?;

    let Some((base, detail)) = find_row(db, id).await? else {
        return Ok(None);
    };

    let (base, detail) = async {
        let txn = db.begin().await?;

        let mut base: entries::ActiveModel = base.into();
        super::entry::apply_base(&mut base, &data.base);
        let base = base.update(&txn).await?;

        let mut detail: appointments::ActiveModel = detail.into();
        apply_detail(&mut detail, &data);
        let detail = detail.update(&txn).await?;

        txn.commit().await?;
        Ok::<_, DbErr>((base, detail))
    }
    .await
    .inspect_err(|e| error!(appointment_id = id, "Failed to update appointment: {e}"))?;

    info!(appointment_id = id, "Appointment updated");
    from_models(base, detail).map(Some)
}

/// Delete an appointment by ID.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
    delete_where(db, id, Some(EntryType::Appointment)).await
}

async fn find_row(db: &DatabaseConnection, id: i32) -> std::result::Result<Option<(entries::Model, appointments::Model)>, DbErr> {
    let row = Entries::find_by_id(id)
        .find_also_related(Appointments)
        .filter(entries::Column::EntryType.eq(EntryType::Appointment.code()))
        .one(db)
        .await?;

    Ok(row.and_then(|(base, detail)| detail.map(|detail| (base, detail))))
}

fn apply_detail(active: &mut appointments::ActiveModel, data: &Appointment) {
    active.salary_cents = Set(data.salary.cents());
    active.currency = Set(data.currency.code().to_string());
    active.position = Set(data.position.trim().to_string());
    active.work_experience_days = Set(data.work_experience_days);
    active.work_experience_in_profession_days = Set(data.work_experience_in_profession_days);
    active.contract_date = Set(data.contract_date);
    active.working_hours = Set(data.working_hours);
    active.id_card_number = Set(non_blank(&data.id_card_number));
    active.id_card_date = Set(data.id_card_date);
    active.id_card_authority = Set(non_blank(&data.id_card_authority));
    active.address = Set(non_blank(&data.address));
}

/// Assemble an appointment from its base and detail rows.
pub(crate) fn from_models(base: entries::Model, detail: appointments::Model) -> Result<Appointment> {
    Ok(Appointment {
        base: base_from_model(base),
        salary: Amount::from_cents(detail.salary_cents),
        currency: detail.currency.parse()?,
        position: detail.position,
        work_experience_days: detail.work_experience_days,
        work_experience_in_profession_days: detail.work_experience_in_profession_days,
        contract_date: detail.contract_date,
        working_hours: detail.working_hours,
        id_card_number: detail.id_card_number,
        id_card_date: detail.id_card_date,
        id_card_authority: detail.id_card_authority,
        address: detail.address,
    })
}

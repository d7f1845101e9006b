//! `appointments` table, keyed by the owning entry.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub entry_id: i32,
    pub salary_cents: i64,
    pub currency: String,
    pub position: String,
    pub work_experience_days: Option<i32>,
    pub work_experience_in_profession_days: Option<i32>,
    pub contract_date: Option<Date>,
    pub working_hours: Option<i32>,
    pub id_card_number: Option<String>,
    pub id_card_date: Option<Date>,
    pub id_card_authority: Option<String>,
    pub address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entries::Entity",
        from = "Column::EntryId",
        to = "super::entries::Column::Id",
        on_delete = "Cascade"
    )]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `entries` table: fields shared by appointments and dismissals.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entry_type: i32,
    pub entry_date: Date,
    pub considered_from_date: Date,
    pub is_nra_confirmed: bool,
    pub company_name: String,
    pub division: Option<String>,
    pub idn: String,
    pub first_name: String,
    pub second_name: Option<String>,
    pub surname: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::appointments::Entity")]
    Appointments,
    #[sea_orm(has_one = "super::dismissals::Entity")]
    Dismissals,
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl Related<super::dismissals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dismissals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Database connection pool and utility functions.

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema,
};
use std::time::Duration;
use tracing::info;
use tracing::log::LevelFilter;

use crate::entities::{entries, prelude::*};

/// Create a new database connection with configured pool settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    if database_url.contains(":memory:") {
        // Every pooled connection would get its own empty in-memory database.
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(5)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300));
    }
    opt.connect_timeout(Duration::from_secs(10))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Test database connection by executing a simple query.
pub async fn test_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(())
}

/// Create the register tables when they do not exist yet.
pub async fn ensure_created(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = [
        schema.create_table_from_entity(Entries),
        schema.create_table_from_entity(Appointments),
        schema.create_table_from_entity(Dismissals),
    ];
    for table in tables.iter_mut() {
        table.if_not_exists();
        db.execute(backend.build(&*table)).await?;
    }

    let index = Index::create()
        .if_not_exists()
        .name("idx_entries_entry_date")
        .table(Entries)
        .col(entries::Column::EntryDate)
        .to_owned();
    db.execute(backend.build(&index)).await?;

    info!("Database schema ready");
    Ok(())
}

/// Get record counts for all tables.
pub async fn get_table_counts(db: &DatabaseConnection) -> Result<TableCounts, DbErr> {
    let entries = Entries::find().count(db).await?;
    let appointments = Appointments::find().count(db).await?;
    let dismissals = Dismissals::find().count(db).await?;

    Ok(TableCounts {
        entries,
        appointments,
        dismissals,
    })
}

/// Table record counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCounts {
    pub entries: u64,
    pub appointments: u64,
    pub dismissals: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_created_is_idempotent() {
        let db = connect("sqlite::memory:").await.unwrap();
        ensure_created(&db).await.unwrap();
        ensure_created(&db).await.unwrap();
        test_connection(&db).await.unwrap();

        let counts = get_table_counts(&db).await.unwrap();
        assert_eq!(
            counts,
            TableCounts {
                entries: 0,
                appointments: 0,
                dismissals: 0
            }
        );
    }
}

use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};
use tracing::info;

use crate::entity::{job, job_application};

/// Name of the unique index that makes a second application for the same
/// (user, job) pair fail at the store.
pub const APPLICATION_UNIQUE_INDEX: &str = "uq_job_application_user_job";

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    prepare_schema(&db).await?;

    Ok(db)
}

/// Create or migrate tables for every entity, then the extra indexes.
pub async fn prepare_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("portal_server::entity::*")
        .sync(db)
        .await?;
    ensure_indexes(db).await
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite indexes, so we create them
/// manually on startup.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    // Concurrent applies for the same pair must not both succeed.
    let unique_application = Index::create()
        .if_not_exists()
        .unique()
        .name(APPLICATION_UNIQUE_INDEX)
        .table(job_application::Entity)
        .col(job_application::Column::UserId)
        .col(job_application::Column::JobId)
        .to_owned();
    create_index(db, &unique_application).await?;
    info!("Ensured index {} exists", APPLICATION_UNIQUE_INDEX);

    // SELECT ... FROM job_application WHERE company_id = ?
    let by_company = Index::create()
        .if_not_exists()
        .name("idx_job_application_company")
        .table(job_application::Entity)
        .col(job_application::Column::CompanyId)
        .to_owned();
    if let Err(e) = create_index(db, &by_company).await {
        tracing::warn!("Failed to create index idx_job_application_company: {}", e);
    }

    // Public listing filters on visibility.
    let visible_jobs = Index::create()
        .if_not_exists()
        .name("idx_job_visible")
        .table(job::Entity)
        .col(job::Column::Visible)
        .to_owned();
    if let Err(e) = create_index(db, &visible_jobs).await {
        tracing::warn!("Failed to create index idx_job_visible: {}", e);
    }

    Ok(())
}

async fn create_index<C: ConnectionTrait>(
    db: &C,
    stmt: &IndexCreateStatement,
) -> Result<(), DbErr> {
    let sql = match db.get_database_backend() {
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    };
    db.execute_unprepared(&sql).await?;
    Ok(())
}

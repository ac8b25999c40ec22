pub mod account;
pub mod application;
pub mod listing;

pub use account::AccountService;
pub use application::ApplicationService;
pub use listing::JobListing;

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entity::{company, job};

/// Load the given companies keyed by ID. Missing IDs are simply absent.
pub(crate) async fn companies_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, company::Model>, DbErr> {
    Ok(company::Entity::find()
        .filter(company::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect())
}

/// Load the given jobs keyed by ID. Missing IDs are simply absent.
pub(crate) async fn jobs_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, job::Model>, DbErr> {
    Ok(job::Entity::find()
        .filter(job::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|j| (j.id, j))
        .collect())
}

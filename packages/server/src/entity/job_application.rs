use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_application")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Identity-provider user ID. Not a foreign key: users can be removed
    /// by webhook while their applications are kept.
    pub user_id: String,

    pub job_id: i32,
    #[sea_orm(belongs_to, from = "job_id", to = "id")]
    pub job: HasOne<super::job::Entity>,

    /// Copied from the job at creation time.
    pub company_id: i32,

    /// One of: Pending, Accepted, Rejected
    pub status: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

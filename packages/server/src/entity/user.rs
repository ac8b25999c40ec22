use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A job seeker. Rows are created and kept in sync by identity-provider webhooks.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// User ID issued by the identity provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,
    pub email: String,
    pub image: String,
    /// Public URL of the uploaded résumé, empty when unset.
    pub resume: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

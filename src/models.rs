use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::users::Role;

/// Wire-facing account profile. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Embedded reference to a user (store owner, rater).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<crate::entity::users::Model> for User {
    fn from(model: crate::entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::users::Model> for UserRef {
    fn from(model: crate::entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

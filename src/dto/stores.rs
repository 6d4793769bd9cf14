use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserRef;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub owner_id: Option<Uuid>,
}

/// Store as the admin list shows it: owner reference plus live aggregates.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStore {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
    pub owner: Option<UserRef>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AdminStoreList {
    #[schema(value_type = Vec<AdminStore>)]
    pub items: Vec<AdminStore>,
}

/// Store as a browsing user sees it, including their own vote.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithMyRating {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
    pub my_rating: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<StoreWithMyRating>)]
    pub items: Vec<StoreWithMyRating>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStore {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
}

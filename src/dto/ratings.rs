use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Rating, UserRef};

#[derive(Deserialize, Debug, ToSchema)]
pub struct SubmitRatingRequest {
    pub value: i32,
}

/// Returned after a vote: the caller's persisted rating and the store's
/// recomputed aggregate.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub rating: Rating,
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithUser {
    pub id: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
    pub user: UserRef,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RatingList {
    #[schema(value_type = Vec<RatingWithUser>)]
    pub items: Vec<RatingWithUser>,
}

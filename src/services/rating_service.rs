use std::collections::HashMap;

use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::ratings::{RatingResponse, SubmitRatingRequest},
    entity::Stores,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::Rating,
    response::ApiResponse,
    state::AppState,
};

pub fn validate_rating_value(value: i32) -> AppResult<()> {
    if !(1..=5).contains(&value) {
        return Err(AppError::Validation(
            "rating value must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

/// Averages are displayed with one decimal.
pub fn round_avg(avg: f64) -> f64 {
    (avg * 10.0).round() / 10.0
}

/// Recompute a store's aggregate from its rating rows. None when unrated.
pub async fn store_aggregates(pool: &DbPool, store_id: Uuid) -> AppResult<(Option<f64>, i64)> {
    let (avg, total): (Option<f64>, i64) =
        sqlx::query_as("SELECT AVG(value)::float8, COUNT(*) FROM ratings WHERE store_id = $1")
            .bind(store_id)
            .fetch_one(pool)
            .await?;
    Ok((avg.map(round_avg), total))
}

/// Batched variant for listings: one grouped query per page of stores.
/// Stores without ratings simply have no entry.
pub async fn aggregates_for(
    pool: &DbPool,
    store_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, (f64, i64)>> {
    if store_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, f64, i64)> = sqlx::query_as(
        r#"
        SELECT store_id, AVG(value)::float8, COUNT(*)
        FROM ratings
        WHERE store_id = ANY($1)
        GROUP BY store_id
        "#,
    )
    .bind(store_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, avg, total)| (id, (round_avg(avg), total)))
        .collect())
}

/// The caller's own votes for a page of stores.
pub async fn my_ratings_for(
    pool: &DbPool,
    user_id: Uuid,
    store_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, i32>> {
    if store_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i32)> =
        sqlx::query_as("SELECT store_id, value FROM ratings WHERE user_id = $1 AND store_id = ANY($2)")
            .bind(user_id)
            .bind(store_ids)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

pub async fn submit_rating(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: SubmitRatingRequest,
) -> AppResult<ApiResponse<RatingResponse>> {
    ensure_capability(user, Capability::SubmitRatings)?;
    validate_rating_value(payload.value)?;

    let store = Stores::find_by_id(store_id).one(&state.orm).await?;
    if store.is_none() {
        return Err(AppError::NotFound);
    }

    // The (user_id, store_id) unique constraint makes a re-vote an update,
    // including under concurrent submissions.
    let rating: Rating = sqlx::query_as(
        r#"
        INSERT INTO ratings (id, user_id, store_id, value)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, store_id)
        DO UPDATE SET value = EXCLUDED.value, updated_at = now()
        RETURNING id, user_id, store_id, value, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(store_id)
    .bind(payload.value)
    .fetch_one(&state.pool)
    .await?;

    let (avg_rating, total_ratings) = store_aggregates(&state.pool, store_id).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "rating_submit",
        Some("ratings"),
        Some(serde_json::json!({ "store_id": store_id, "value": payload.value })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Rating saved",
        RatingResponse {
            rating,
            avg_rating,
            total_ratings,
        },
        None,
    ))
}

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::ratings::{RatingList, RatingWithUser},
    dto::stores::OwnerStore,
    entity::{Stores, stores},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::UserRef,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::rating_service,
    state::AppState,
};

#[derive(FromRow)]
struct RatingWithUserRow {
    id: Uuid,
    value: i32,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    name: String,
    email: String,
}

async fn find_own_store(state: &AppState, user: &AuthUser) -> AppResult<stores::Model> {
    let store = Stores::find()
        .filter(stores::Column::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    match store {
        Some(store) => Ok(store),
        None => Err(AppError::NotFound),
    }
}

/// The caller's assigned store with its live aggregate. Owners can only ever
/// reach the store keyed to their own id.
pub async fn my_store(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OwnerStore>> {
    ensure_capability(user, Capability::ViewOwnStore)?;
    let store = find_own_store(state, user).await?;
    let (avg_rating, total_ratings) =
        rating_service::store_aggregates(&state.pool, store.id).await?;

    Ok(ApiResponse::success(
        "Store",
        OwnerStore {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            created_at: store.created_at.with_timezone(&Utc),
            avg_rating,
            total_ratings,
        },
        None,
    ))
}

/// Ratings received by the caller's store, newest first, with rater details.
pub async fn my_store_ratings(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<RatingList>> {
    ensure_capability(user, Capability::ViewOwnStore)?;
    let store = find_own_store(state, user).await?;
    let (page, page_size, offset) = pagination.validate()?;

    let rows = sqlx::query_as::<_, RatingWithUserRow>(
        r#"
        SELECT r.id, r.value, r.created_at,
               u.id AS user_id, u.name, u.email
        FROM ratings r
        JOIN users u ON u.id = r.user_id
        WHERE r.store_id = $1
        ORDER BY r.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(store.id)
    .bind(page_size)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ratings WHERE store_id = $1")
        .bind(store.id)
        .fetch_one(&state.pool)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| RatingWithUser {
            id: row.id,
            value: row.value,
            created_at: row.created_at,
            user: UserRef {
                id: row.user_id,
                name: row.name,
                email: row.email,
            },
        })
        .collect();

    let meta = Meta::new(page, page_size, total.0);
    Ok(ApiResponse::success(
        "Ratings",
        RatingList { items },
        Some(meta),
    ))
}

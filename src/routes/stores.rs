use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::ratings::{RatingResponse, SubmitRatingRequest},
    dto::stores::StoreList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::StoreListQuery,
    services::{rating_service, store_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores))
        .route("/{id}/rating", post(submit_rating))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, default 10"),
        ("search" = Option<String>, Query, description = "Substring match on name, email, address"),
        ("sortBy" = Option<String>, Query, description = "name, email or createdAt"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List stores with aggregates and own rating", body = ApiResponse<StoreList>),
        (status = 400, description = "Invalid paging or sort parameters"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StoreListQuery>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = store_service::list_stores(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/rating",
    params(
        ("id" = Uuid, Path, description = "Store ID")
    ),
    request_body = SubmitRatingRequest,
    responses(
        (status = 200, description = "Rating saved", body = ApiResponse<RatingResponse>),
        (status = 400, description = "Value out of range"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn submit_rating(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitRatingRequest>,
) -> AppResult<Json<ApiResponse<RatingResponse>>> {
    let resp = rating_service::submit_rating(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::ratings::RatingList,
    dto::stores::OwnerStore,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::owner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/store", get(my_store))
        .route("/store/ratings", get(my_store_ratings))
}

#[utoipa::path(
    get,
    path = "/api/owner/store",
    responses(
        (status = 200, description = "The caller's store with aggregates", body = ApiResponse<OwnerStore>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No store assigned"),
    ),
    security(("bearer_auth" = [])),
    tag = "Owner"
)]
pub async fn my_store(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OwnerStore>>> {
    let resp = owner_service::my_store(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/owner/store/ratings",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "Ratings for the caller's store, newest first", body = ApiResponse<RatingList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No store assigned"),
    ),
    security(("bearer_auth" = [])),
    tag = "Owner"
)]
pub async fn my_store_ratings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<RatingList>>> {
    let resp = owner_service::my_store_ratings(&state, &user, pagination).await?;
    Ok(Json(resp))
}

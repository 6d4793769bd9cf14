use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::admin::DashboardStats,
    dto::stores::{AdminStore, AdminStoreList, CreateStoreRequest},
    dto::users::{CreateUserRequest, UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    routes::params::{AdminStoreListQuery, UserListQuery},
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users).post(create_user))
        .route("/stores", get(list_stores).post(create_store))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Totals and per-role user counts", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, default 10"),
        ("search" = Option<String>, Query, description = "Substring match on name, email, address"),
        ("role" = Option<String>, Query, description = "Filter by role: ADMIN, OWNER, USER"),
        ("sortBy" = Option<String>, Query, description = "name, email or createdAt"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>),
        (status = 400, description = "Invalid paging or sort parameters"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already registered"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::create_user(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, default 10"),
        ("search" = Option<String>, Query, description = "Substring match on name, email, address"),
        ("ownerId" = Option<Uuid>, Query, description = "Filter by owner"),
        ("sortBy" = Option<String>, Query, description = "name, email or createdAt"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List stores with owner and aggregates", body = ApiResponse<AdminStoreList>),
        (status = 400, description = "Invalid paging or sort parameters"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminStoreListQuery>,
) -> AppResult<Json<ApiResponse<AdminStoreList>>> {
    let resp = admin_service::list_stores(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 200, description = "Store created", body = ApiResponse<AdminStore>),
        (status = 400, description = "Invalid fields or ownerId"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Store email already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<Json<ApiResponse<AdminStore>>> {
    let resp = admin_service::create_store(&state, &user, payload).await?;
    Ok(Json(resp))
}

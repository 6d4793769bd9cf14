use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::admin::{DashboardStats, UsersByRole},
    dto::stores::{AdminStore, AdminStoreList, CreateStoreRequest},
    dto::users::{CreateUserRequest, UserList},
    entity::{
        Ratings, Stores, Users,
        stores::{self, ActiveModel as StoreActive},
        users::{self, ActiveModel as UserActive, Role},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::{User, UserRef},
    response::{ApiResponse, Meta},
    routes::params::{AdminStoreListQuery, ListSortBy, SortOrder, UserListQuery},
    services::{auth_service, rating_service, store_service},
    state::AppState,
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_capability(user, Capability::ViewDashboard)?;

    let total_users = Users::find().count(&state.orm).await? as i64;
    let total_stores = Stores::find().count(&state.orm).await? as i64;
    let total_ratings = Ratings::find().count(&state.orm).await? as i64;

    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
            .fetch_all(&state.pool)
            .await?;

    let mut users_by_role = UsersByRole::default();
    for (role, count) in rows {
        match role.as_str() {
            "ADMIN" => users_by_role.admin = count,
            "OWNER" => users_by_role.owner = count,
            "USER" => users_by_role.user = count,
            other => tracing::warn!(role = %other, "unknown role in users table"),
        }
    }

    Ok(ApiResponse::success(
        "Dashboard",
        DashboardStats {
            total_users,
            total_stores,
            total_ratings,
            users_by_role,
        },
        None,
    ))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_capability(user, Capability::ManageUsers)?;
    let (page, page_size, offset) = query.pagination().validate()?;
    let sort_by = ListSortBy::parse(query.sort_by.as_deref(), ListSortBy::CreatedAt)?;
    let sort_order = SortOrder::parse(query.sort_order.as_deref(), SortOrder::Desc)?;

    let mut condition = Condition::all();
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(users::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(users::Column::Email).ilike(pattern.clone()))
                .add(Expr::col(users::Column::Address).ilike(pattern)),
        );
    }
    if let Some(role) = query.role {
        condition = condition.add(users::Column::Role.eq(role));
    }

    let sort_col = match sort_by {
        ListSortBy::Name => users::Column::Name,
        ListSortBy::Email => users::Column::Email,
        ListSortBy::CreatedAt => users::Column::CreatedAt,
    };

    let mut finder = Users::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(page_size as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, page_size, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn create_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_capability(user, Capability::ManageUsers)?;
    let CreateUserRequest {
        name,
        email,
        password,
        address,
        role,
    } = payload;

    auth_service::validate_name(&name)?;
    auth_service::validate_email(&email)?;
    auth_service::validate_password(&password)?;
    auth_service::validate_address(address.as_deref())?;

    let exist = Users::find()
        .filter(users::Column::Email.eq(&email))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = auth_service::hash_password(&password)?;

    let active = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        address: Set(address),
        role: Set(role),
        created_at: NotSet,
    };
    let created = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "user_create",
        Some("users"),
        Some(serde_json::json!({ "user_id": created.id, "role": created.role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User created",
        User::from(created),
        None,
    ))
}

pub async fn list_stores(
    state: &AppState,
    user: &AuthUser,
    query: AdminStoreListQuery,
) -> AppResult<ApiResponse<AdminStoreList>> {
    ensure_capability(user, Capability::ManageStores)?;
    let (page, page_size, offset) = query.pagination().validate()?;
    let sort_by = ListSortBy::parse(query.sort_by.as_deref(), ListSortBy::CreatedAt)?;
    let sort_order = SortOrder::parse(query.sort_order.as_deref(), SortOrder::Desc)?;

    let mut condition = store_service::search_condition(query.search.as_deref());
    if let Some(owner_id) = query.owner_id {
        condition = condition.add(stores::Column::OwnerId.eq(owner_id));
    }

    let total = Stores::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await? as i64;

    let sort_col = store_service::sort_column(sort_by);
    let mut finder = Stores::find().find_also_related(Users).filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let rows = finder
        .limit(page_size as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|(s, _)| s.id).collect();
    let aggregates = rating_service::aggregates_for(&state.pool, &ids).await?;

    let items = rows
        .into_iter()
        .map(|(store, owner)| {
            let (avg_rating, total_ratings) = match aggregates.get(&store.id) {
                Some(&(avg, count)) => (Some(avg), count),
                None => (None, 0),
            };
            AdminStore {
                id: store.id,
                name: store.name,
                email: store.email,
                address: store.address,
                owner_id: store.owner_id,
                created_at: store.created_at.with_timezone(&Utc),
                avg_rating,
                total_ratings,
                owner: owner.map(UserRef::from),
            }
        })
        .collect();

    let meta = Meta::new(page, page_size, total);
    Ok(ApiResponse::success(
        "Stores",
        AdminStoreList { items },
        Some(meta),
    ))
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<AdminStore>> {
    ensure_capability(user, Capability::ManageStores)?;
    let CreateStoreRequest {
        name,
        email,
        address,
        owner_id,
    } = payload;

    if name.trim().is_empty() {
        return Err(AppError::Validation("store name must not be empty".into()));
    }
    if address.trim().is_empty() {
        return Err(AppError::Validation(
            "store address must not be empty".into(),
        ));
    }
    if let Some(email) = email.as_deref() {
        auth_service::validate_email(email)?;
        let exist = Stores::find()
            .filter(stores::Column::Email.eq(email))
            .one(&state.orm)
            .await?;
        if exist.is_some() {
            return Err(AppError::Conflict(
                "A store with this email already exists".into(),
            ));
        }
    }

    let owner = match owner_id {
        Some(owner_id) => {
            let owner = Users::find_by_id(owner_id).one(&state.orm).await?;
            match owner {
                Some(owner) if owner.role == Role::Owner => Some(owner),
                Some(_) => {
                    return Err(AppError::Validation(
                        "ownerId must reference a user with the OWNER role".into(),
                    ));
                }
                None => {
                    return Err(AppError::Validation(
                        "ownerId does not reference an existing user".into(),
                    ));
                }
            }
        }
        None => None,
    };

    let active = StoreActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        address: Set(address),
        owner_id: Set(owner_id),
        created_at: NotSet,
    };
    let store = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "store_create",
        Some("stores"),
        Some(serde_json::json!({ "store_id": store.id, "owner_id": store.owner_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Store created",
        AdminStore {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            owner_id: store.owner_id,
            created_at: store.created_at.with_timezone(&Utc),
            avg_rating: None,
            total_ratings: 0,
            owner: owner.map(UserRef::from),
        },
        None,
    ))
}

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::stores::{StoreList, StoreWithMyRating},
    entity::{Stores, stores::Column},
    error::AppResult,
    middleware::auth::{AuthUser, Capability, ensure_capability},
    response::{ApiResponse, Meta},
    routes::params::{ListSortBy, SortOrder, StoreListQuery},
    services::rating_service,
    state::AppState,
};

pub fn sort_column(sort_by: ListSortBy) -> Column {
    match sort_by {
        ListSortBy::Name => Column::Name,
        ListSortBy::Email => Column::Email,
        ListSortBy::CreatedAt => Column::CreatedAt,
    }
}

pub fn search_condition(search: Option<&str>) -> Condition {
    let mut condition = Condition::all();
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Stores, Column::Name)).ilike(pattern.clone()))
                .add(Expr::col((Stores, Column::Email)).ilike(pattern.clone()))
                .add(Expr::col((Stores, Column::Address)).ilike(pattern)),
        );
    }
    condition
}

/// Store catalogue for a regular user: searchable, sortable, paginated, each
/// row carrying the live aggregate and the caller's own vote.
pub async fn list_stores(
    state: &AppState,
    user: &AuthUser,
    query: StoreListQuery,
) -> AppResult<ApiResponse<StoreList>> {
    ensure_capability(user, Capability::BrowseStores)?;
    let (page, page_size, offset) = query.pagination().validate()?;
    let sort_by = ListSortBy::parse(query.sort_by.as_deref(), ListSortBy::Name)?;
    let sort_order = SortOrder::parse(query.sort_order.as_deref(), SortOrder::Asc)?;

    let condition = search_condition(query.search.as_deref());
    let sort_col = sort_column(sort_by);

    let mut finder = Stores::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let stores = finder
        .limit(page_size as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = stores.iter().map(|s| s.id).collect();
    let aggregates = rating_service::aggregates_for(&state.pool, &ids).await?;
    let mine = rating_service::my_ratings_for(&state.pool, user.user_id, &ids).await?;

    let items = stores
        .into_iter()
        .map(|model| {
            let (avg_rating, total_ratings) = match aggregates.get(&model.id) {
                Some(&(avg, count)) => (Some(avg), count),
                None => (None, 0),
            };
            StoreWithMyRating {
                id: model.id,
                name: model.name,
                email: model.email,
                address: model.address,
                created_at: model.created_at.with_timezone(&Utc),
                avg_rating,
                total_ratings,
                my_rating: mine.get(&model.id).copied(),
            }
        })
        .collect();

    let meta = Meta::new(page, page_size, total);
    Ok(ApiResponse::success(
        "Stores",
        StoreList { items },
        Some(meta),
    ))
}

use axum_store_rating_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, SignupRequest},
        stores::CreateStoreRequest,
        users::CreateUserRequest,
    },
    entity::{
        Users,
        stores::ActiveModel as StoreActive,
        users::{ActiveModel as UserActive, Column as UserColumn, Role},
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{AdminStoreListQuery, UserListQuery},
    services::{admin_service, auth_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;

// Integration flow: signup/login plus the admin listing contract
// (pagination envelope, sort allow-list, owner assignment rules).
#[tokio::test]
async fn signup_conflict_and_admin_listing_flow() -> anyhow::Result<()> {
    let state = match setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    // Token issuing reads the secret from the environment.
    unsafe {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let signup = auth_service::signup(
        &state,
        SignupRequest {
            name: "Johnathan Maxwell Carter".into(),
            email: "johnathan@auth.test".into(),
            password: "Secret@123".into(),
            address: Some("221B Baker Street".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!signup.token.is_empty());
    assert_eq!(signup.user.role, Role::User);

    // Signing up again with the same email conflicts and creates no row.
    assert!(matches!(
        auth_service::signup(
            &state,
            SignupRequest {
                name: "Johnathan Maxwell Carter".into(),
                email: "johnathan@auth.test".into(),
                password: "Secret@123".into(),
                address: None,
            },
        )
        .await,
        Err(AppError::Conflict(_))
    ));
    let count = Users::find()
        .filter(UserColumn::Email.eq("johnathan@auth.test"))
        .count(&state.orm)
        .await?;
    assert_eq!(count, 1);

    // Credentials must match exactly.
    assert!(
        auth_service::login(
            &state,
            LoginRequest {
                email: "johnathan@auth.test".into(),
                password: "Secret@123".into(),
            },
        )
        .await
        .is_ok()
    );
    assert!(matches!(
        auth_service::login(
            &state,
            LoginRequest {
                email: "johnathan@auth.test".into(),
                password: "Wrong@123".into(),
            },
        )
        .await,
        Err(AppError::Unauthorized(_))
    ));

    let admin_id = create_user(&state, Role::Admin, "Listing Admin", "admin@auth.test").await?;
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: Role::Admin,
    };

    // 25 stores -> page 2 of 10 holds 10 rows, 3 pages in total.
    for i in 0..25 {
        StoreActive {
            id: Set(Uuid::new_v4()),
            name: Set(format!("Store {i:02}")),
            email: Set(None),
            address: Set(format!("{i} Market Road")),
            owner_id: Set(None),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
    }

    let listing = admin_service::list_stores(
        &state,
        &auth_admin,
        AdminStoreListQuery {
            page: Some(2),
            page_size: Some(10),
            search: None,
            owner_id: None,
            sort_by: Some("name".into()),
            sort_order: Some("asc".into()),
        },
    )
    .await?;
    let pagination = listing.pagination.clone().unwrap();
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.total, 25);
    assert_eq!(pagination.total_pages, 3);
    let items = listing.data.unwrap().items;
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].name, "Store 10");

    // Sort columns outside the allow-list are rejected.
    assert!(matches!(
        admin_service::list_users(
            &state,
            &auth_admin,
            UserListQuery {
                page: None,
                page_size: None,
                search: None,
                role: None,
                sort_by: Some("password_hash".into()),
                sort_order: None,
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));

    // Stores can only be assigned to OWNER accounts.
    let plain_user_id = create_user(&state, Role::User, "Plain User", "plain@auth.test").await?;
    assert!(matches!(
        admin_service::create_store(
            &state,
            &auth_admin,
            CreateStoreRequest {
                name: "Orphan Store".into(),
                email: None,
                address: "Nowhere".into(),
                owner_id: Some(plain_user_id),
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));

    // Admin-created accounts go through the same field validation.
    assert!(matches!(
        admin_service::create_user(
            &state,
            &auth_admin,
            CreateUserRequest {
                name: "Valid Length Owner Name".into(),
                email: "newowner@auth.test".into(),
                password: "weak".into(),
                address: None,
                role: Role::Owner,
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));
    let created = admin_service::create_user(
        &state,
        &auth_admin,
        CreateUserRequest {
            name: "Valid Length Owner Name".into(),
            email: "newowner@auth.test".into(),
            password: "Owner@1234".into(),
            address: None,
            role: Role::Owner,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.role, Role::Owner);

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE ratings, audit_logs, stores, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(Some(AppState { pool, orm }))
}

async fn create_user(
    state: &AppState,
    role: Role,
    name: &str,
    email: &str,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        address: Set(None),
        role: Set(role),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

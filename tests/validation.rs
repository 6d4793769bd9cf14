use axum_store_rating_api::{
    entity::users::Role,
    error::AppError,
    middleware::auth::{Capability, role_capabilities},
    response::Meta,
    routes::params::{ListSortBy, Pagination, SortOrder},
    services::{auth_service, rating_service},
};

#[test]
fn pagination_defaults_and_offset() {
    let pagination = Pagination {
        page: None,
        page_size: None,
    };
    assert_eq!(pagination.validate().unwrap(), (1, 10, 0));

    let pagination = Pagination {
        page: Some(3),
        page_size: Some(25),
    };
    assert_eq!(pagination.validate().unwrap(), (3, 25, 50));
}

#[test]
fn pagination_rejects_out_of_range_values() {
    let zero_page = Pagination {
        page: Some(0),
        page_size: None,
    };
    assert!(matches!(
        zero_page.validate(),
        Err(AppError::Validation(_))
    ));

    let negative_page = Pagination {
        page: Some(-2),
        page_size: None,
    };
    assert!(matches!(
        negative_page.validate(),
        Err(AppError::Validation(_))
    ));

    let zero_size = Pagination {
        page: None,
        page_size: Some(0),
    };
    assert!(matches!(
        zero_size.validate(),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn pagination_caps_page_size() {
    let huge = Pagination {
        page: Some(1),
        page_size: Some(5000),
    };
    assert_eq!(huge.validate().unwrap(), (1, 100, 0));
}

#[test]
fn meta_computes_total_pages() {
    assert_eq!(Meta::new(2, 10, 25).total_pages, 3);
    assert_eq!(Meta::new(1, 10, 30).total_pages, 3);
    // An empty listing still reports one page.
    assert_eq!(Meta::new(1, 10, 0).total_pages, 1);
}

#[test]
fn sort_by_is_allow_listed() {
    assert_eq!(
        ListSortBy::parse(Some("name"), ListSortBy::CreatedAt).unwrap(),
        ListSortBy::Name
    );
    assert_eq!(
        ListSortBy::parse(Some("email"), ListSortBy::CreatedAt).unwrap(),
        ListSortBy::Email
    );
    assert_eq!(
        ListSortBy::parse(Some("createdAt"), ListSortBy::Name).unwrap(),
        ListSortBy::CreatedAt
    );
    assert_eq!(
        ListSortBy::parse(None, ListSortBy::Name).unwrap(),
        ListSortBy::Name
    );
    // Column names outside the list never reach the query builder.
    assert!(matches!(
        ListSortBy::parse(Some("password_hash"), ListSortBy::Name),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        ListSortBy::parse(Some("id; DROP TABLE users"), ListSortBy::Name),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn sort_order_parses() {
    assert_eq!(
        SortOrder::parse(Some("asc"), SortOrder::Desc).unwrap(),
        SortOrder::Asc
    );
    assert_eq!(
        SortOrder::parse(Some("desc"), SortOrder::Asc).unwrap(),
        SortOrder::Desc
    );
    assert_eq!(
        SortOrder::parse(None, SortOrder::Desc).unwrap(),
        SortOrder::Desc
    );
    assert!(matches!(
        SortOrder::parse(Some("sideways"), SortOrder::Asc),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn rating_value_range() {
    assert!(matches!(
        rating_service::validate_rating_value(0),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        rating_service::validate_rating_value(6),
        Err(AppError::Validation(_))
    ));
    for value in 1..=5 {
        assert!(rating_service::validate_rating_value(value).is_ok());
    }
}

#[test]
fn average_is_rounded_to_one_decimal() {
    assert_eq!(rating_service::round_avg(4.0), 4.0);
    assert_eq!(rating_service::round_avg(3.966_666), 4.0);
    assert_eq!(rating_service::round_avg(4.25), 4.3);
    assert_eq!(rating_service::round_avg(2.349_999), 2.3);
}

#[test]
fn name_length_bounds() {
    assert!(matches!(
        auth_service::validate_name("Shorty"),
        Err(AppError::Validation(_))
    ));
    assert!(auth_service::validate_name("Exactly Twenty Chars").is_ok());
    assert!(auth_service::validate_name(&"a".repeat(60)).is_ok());
    assert!(matches!(
        auth_service::validate_name(&"a".repeat(61)),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn password_rules() {
    assert!(auth_service::validate_password("Secret@123").is_ok());
    // Too short, too long, missing uppercase, missing special.
    assert!(matches!(
        auth_service::validate_password("S@1a"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::validate_password("Secret@123456789x"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::validate_password("secret@123"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::validate_password("Secret1234"),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn email_shape() {
    assert!(auth_service::validate_email("user@example.com").is_ok());
    assert!(matches!(
        auth_service::validate_email("not-an-email"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::validate_email("@example.com"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::validate_email("user@nodot"),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn address_length() {
    assert!(auth_service::validate_address(None).is_ok());
    assert!(auth_service::validate_address(Some(&"a".repeat(400))).is_ok());
    assert!(matches!(
        auth_service::validate_address(Some(&"a".repeat(401))),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn capability_sets_are_disjoint() {
    let admin = role_capabilities(Role::Admin);
    let owner = role_capabilities(Role::Owner);
    let user = role_capabilities(Role::User);

    assert!(admin.contains(&Capability::ManageUsers));
    assert!(admin.contains(&Capability::ViewDashboard));
    assert!(owner.contains(&Capability::ViewOwnStore));
    assert!(user.contains(&Capability::SubmitRatings));

    for capability in admin {
        assert!(!owner.contains(capability));
        assert!(!user.contains(capability));
    }
    for capability in owner {
        assert!(!user.contains(capability));
    }
}

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_store_rating_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(
        &pool,
        "System Administrator",
        "admin@example.com",
        "Admin@1234",
        "ADMIN",
        None,
    )
    .await?;

    let owners = [
        ("Aarav", "aarav@store.com", "Mumbai, MH"),
        ("Vihaan", "vihaan@store.com", "Pune, MH"),
        ("Aditya", "aditya@store.com", "Delhi, DL"),
        ("Sai", "sai@store.com", "Bangalore, KA"),
        ("Reyansh", "reyansh@store.com", "Hyderabad, TS"),
    ];
    let mut owner_ids = Vec::new();
    for (name, email, address) in owners {
        owner_ids.push(ensure_user(&pool, name, email, "Owner@1234", "OWNER", Some(address)).await?);
    }

    let stores = [
        ("Tech World", "Andheri East, Mumbai"),
        ("Fashion Hub", "Koregaon Park, Pune"),
        ("Green Grocers", "Connaught Place, Delhi"),
        ("Book Haven", "Indiranagar, Bangalore"),
        ("Sports Gear", "Jubilee Hills, Hyderabad"),
        ("Home Decor", "Bandra West, Mumbai"),
        ("Gadget Guru", "Whitefield, Bangalore"),
    ];
    let mut store_ids = Vec::new();
    for (i, &(name, address)) in stores.iter().enumerate() {
        // Stores cycle through the owners round-robin.
        let owner_id = owner_ids[i % owner_ids.len()];
        let email = format!(
            "contact.{}@example.com",
            name.replace(' ', "").to_lowercase()
        );
        store_ids.push(ensure_store(&pool, name, &email, address, owner_id).await?);
    }

    let users = [
        ("Priya", "priya@example.com", "Chennai, TN"),
        ("Rohan", "rohan@example.com", "Kolkata, WB"),
        ("Meera", "meera@example.com", "Jaipur, RJ"),
    ];
    let mut user_ids = Vec::new();
    for (name, email, address) in users {
        user_ids.push(ensure_user(&pool, name, email, "User@1234", "USER", Some(address)).await?);
    }

    // A spread of votes so listings show live aggregates.
    for (i, user_id) in user_ids.iter().enumerate() {
        for (j, store_id) in store_ids.iter().enumerate() {
            if (i + j) % 2 == 0 {
                let value = ((i + j) % 5 + 1) as i32;
                ensure_rating(&pool, *user_id, *store_id, value).await?;
            }
        }
    }

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    address: Option<&str>,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, address, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(address)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_store(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    address: &str,
    owner_id: Uuid,
) -> anyhow::Result<Uuid> {
    let (store_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO stores (id, name, email, address, owner_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET owner_id = EXCLUDED.owner_id
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(address)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    println!("Ensured store {name} (owner={owner_id})");
    Ok(store_id)
}

async fn ensure_rating(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    store_id: Uuid,
    value: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ratings (id, user_id, store_id, value)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, store_id) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(store_id)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

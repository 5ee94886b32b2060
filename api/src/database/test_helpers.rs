/// Shared test helpers for database tests
use super::{Database, NewPlace};
use crate::search::Region;
use sqlx::sqlite::SqlitePoolOptions;

/// Set up an in-memory database with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Migration failed");

    Database { pool }
}

/// A place with every optional field filled and no tags
pub fn sample_place(name: &str, region: Region) -> NewPlace {
    NewPlace {
        name: name.to_string(),
        description: Some(format!("{} near campus", name)),
        image_url: Some("https://example.com/place.jpg".to_string()),
        price: 15000.0,
        address: Some("Jl. Cisitu Lama".to_string()),
        latitude: Some(-6.88),
        longitude: Some(107.61),
        time_open: Some("08:00".to_string()),
        time_close: Some("21:00".to_string()),
        distance: 1.0,
        rating: 4.0,
        region,
        category: None,
        platform: None,
        payment_method: None,
    }
}

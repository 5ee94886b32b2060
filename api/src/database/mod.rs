/// Default database URL for local development
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./places.db?mode=rwc";

pub mod places;
pub mod types;

pub use places::{NewPlace, Place};
pub use types::Database;

#[cfg(test)]
pub mod test_helpers;

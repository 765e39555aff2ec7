//! Repository layer for database operations

pub mod holdings;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub holdings: holdings::HoldingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            holdings: holdings::HoldingsRepository::new(pool.clone()),
            pool,
        }
    }
}

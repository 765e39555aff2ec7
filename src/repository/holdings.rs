//! Holdings repository: per-copy data consumed by the hold logic

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::HoldingItem};

/// `specimens.borrow_status` value for borrowable copies
const BORROWABLE: i16 = 98;

#[derive(Clone)]
pub struct HoldingsRepository {
    pool: Pool<Postgres>,
}

impl HoldingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the holdings of an item (excludes archived specimens).
    ///
    /// A copy is available when it is borrowable, in circulation and not on an
    /// open loan. Copies without a source have no location.
    pub async fn get_holdings(&self, item_id: i32) -> AppResult<Vec<HoldingItem>> {
        let holdings = sqlx::query_as::<_, HoldingItem>(
            r#"
            SELECT (s.borrow_status = $2
                    AND s.circulation_status = 0
                    AND NOT EXISTS (
                        SELECT 1 FROM loans l
                        WHERE l.specimen_id = s.id AND l.returned_date IS NULL
                    )) AS available,
                   so.name AS location,
                   s.hold_override
            FROM specimens s
            LEFT JOIN sources so ON s.source_id = so.id
            WHERE s.item_id = $1 AND s.archived_at IS NULL
            ORDER BY s.barcode, s.id
            "#,
        )
        .bind(item_id)
        .bind(BORROWABLE)
        .fetch_all(&self.pool)
        .await?;

        Ok(holdings)
    }

    /// A patron may place a title hold on an existing, non-archived item
    /// unless one of its copies is already on loan to them.
    pub async fn title_hold_allowed(&self, item_id: i32, user_id: i32) -> AppResult<bool> {
        let allowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                       SELECT 1 FROM items i WHERE i.id = $1 AND i.archived_at IS NULL
                   )
               AND NOT EXISTS (
                       SELECT 1 FROM loans l
                       JOIN specimens s ON l.specimen_id = s.id
                       WHERE s.item_id = $1 AND l.user_id = $2 AND l.returned_date IS NULL
                   )
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(allowed)
    }

    /// Connectivity probe used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

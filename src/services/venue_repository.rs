use crate::database::DatabaseHandle;
use crate::error::AppResult;
use crate::models::{Venue, VENUE_COLUMNS};
use async_trait::async_trait;
use std::sync::OnceLock;
use tracing::debug;

/// Numeric columns are cast so NUMERIC/REAL/INTEGER storage all decode the same way.
fn select_expression(column: &str) -> String {
    match column {
        "price" | "rating" => format!("{column}::float8 AS {column}"),
        "capacity" | "reviews" => format!("{column}::int8 AS {column}"),
        _ => column.to_string(),
    }
}

pub fn select_venues_sql() -> &'static str {
    static SQL: OnceLock<String> = OnceLock::new();
    SQL.get_or_init(|| {
        let columns: Vec<String> = VENUE_COLUMNS.iter().map(|c| select_expression(c)).collect();
        format!("SELECT {} FROM venues", columns.join(", "))
    })
}

/// Read access to the venue rows behind the HTTP handlers.
#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn list_venues(&self) -> AppResult<Vec<Venue>>;
}

#[derive(Clone)]
pub struct VenueRepository {
    database: DatabaseHandle,
}

impl VenueRepository {
    pub fn new(database: DatabaseHandle) -> Self {
        Self { database }
    }
}

#[async_trait]
impl VenueStore for VenueRepository {
    /// Reads every venue on a single pooled connection. The connection goes
    /// back to the pool when it drops, on success and on error alike.
    async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        let pool = self.database.pool()?;
        let mut conn = pool.acquire().await?;

        let venues = sqlx::query_as::<_, Venue>(select_venues_sql())
            .fetch_all(&mut *conn)
            .await?;

        debug!("Fetched {} venues", venues.len());
        Ok(venues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn unavailable_database_fails_before_querying() {
        let repository = VenueRepository::new(DatabaseHandle::unavailable());
        let err = repository.list_venues().await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::ServiceUnavailable(_)));
    }

    #[test]
    fn select_uses_fixed_column_order() {
        assert_eq!(
            select_venues_sql(),
            "SELECT name, location, price::float8 AS price, capacity::int8 AS capacity, \
             rating::float8 AS rating, reviews::int8 AS reviews, description FROM venues"
        );
    }
}

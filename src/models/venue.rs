use serde::Serialize;

/// Column order shared by the SELECT statement and the CSV header.
pub const VENUE_COLUMNS: [&str; 7] = [
    "name",
    "location",
    "price",
    "capacity",
    "rating",
    "reviews",
    "description",
];

/// A venue row as written by the crawler. Any column may be NULL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, sqlx::FromRow)]
pub struct Venue {
    pub name: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub capacity: Option<i64>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub description: Option<String>,
}

fn field<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Venue {
    /// Fields rendered in `VENUE_COLUMNS` order; NULL becomes an empty string.
    pub fn to_record(&self) -> [String; 7] {
        [
            field(&self.name),
            field(&self.location),
            field(&self.price),
            field(&self.capacity),
            field(&self.rating),
            field(&self.reviews),
            field(&self.description),
        ]
    }
}

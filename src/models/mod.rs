pub mod venue;

pub use venue::{Venue, VENUE_COLUMNS};

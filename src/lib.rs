//! Two small HTTP services that hand out the crawler's venue data as a CSV
//! download: one reads the `venues` table from Postgres, the other serves a
//! CSV file from a mounted volume.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod monitoring;
pub mod services;
pub mod telemetry;

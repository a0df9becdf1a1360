//! CARVER Risk Register
//!
//! Scores assets on the six CARVER factors, derives Likelihood, Impact and a
//! composite risk score, places them on a 5×5 heatmap, and moves the
//! register in and out of CSV, JSON and Markdown.

pub mod app;
pub mod cli;
pub mod errors;
pub mod exporter;
pub mod heatmap;
pub mod importer;
pub mod models;
pub mod reporter;
pub mod sample;
pub mod scoring;
pub mod selftest;
pub mod store;
pub mod ui;
pub mod validator;
pub mod views;

pub use app::AppController;
pub use errors::{CarverError, CarverResult};
pub use scoring::{bucket, derive};

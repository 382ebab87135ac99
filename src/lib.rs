#![forbid(unsafe_code)]

//! `waitline` — clinic front-desk waiting queue core.
//!
//! Maintains a dense, gap-free ordering of waiting patients, the queue
//! entry lifecycle (check-in through completion), wait-time estimation,
//! and the outside-waiting SMS notification sweep.

pub mod config;
pub mod errors;
pub mod estimator;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod queue;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};

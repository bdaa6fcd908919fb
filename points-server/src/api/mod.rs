//! HTTP API handlers.

pub mod points;

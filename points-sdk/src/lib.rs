#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

//! Wire types shared by the points quote service and its callers.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
pub mod quote_id;

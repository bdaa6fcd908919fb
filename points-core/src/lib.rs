#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod abi;
pub mod config;
pub mod deposit;
pub mod entities;
pub mod framework;
pub mod quote;
pub mod settlement;
pub mod sources;
pub mod status;

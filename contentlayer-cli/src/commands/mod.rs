//! CLI command implementations.

pub mod campaigns;
pub mod common;
pub mod config;
pub mod packages;
pub mod resolve;

//! Test fixtures for clean-route.
//!
//! Provides:
//! - Real city coordinates (from OpenStreetMap)
//! - In-memory route, air-quality and station providers

#![allow(dead_code)]

pub mod cities;
pub mod providers;

pub use cities::*;
pub use providers::*;

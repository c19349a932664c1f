//! Shelf application library
//!
//! The book catalog module plus the bootstrap sequence shared by the
//! `shelf-app` server binary and the `shelf` CLI.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::{build_registry, migrate, serve};

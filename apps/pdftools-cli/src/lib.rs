//! Command-line client for the PDF transform backend
//!
//! `pages` runs offline against the page-selection core; every other
//! command uploads to the backend configured in `pdftools.toml`.

pub mod client;
pub mod commands;
pub mod config;

pub use client::{BackendClient, Download};
pub use config::{BackendConfig, Config, PreviewConfig};

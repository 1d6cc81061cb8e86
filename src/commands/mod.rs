//! Command implementations for the ciqw CLI

pub mod auth;
pub mod completions;
pub mod config;
pub mod docs;
pub mod helpers;
pub mod keys;
pub mod project;
pub mod sdk;
pub mod version;

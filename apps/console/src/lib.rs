//! Regulator console library.
//!
//! Client core for the regulatory authority's administration console:
//! typed REST access with a query cache and toast notifications, a generic
//! management table, entity forms, and the incident review workflow.

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod services;
pub mod table;
pub mod workflow;

pub use console::Console;

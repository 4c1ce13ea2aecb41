//! Toggl Track integration
//!
//! Lists projects and clients of one workspace.

mod client;
mod models;

pub use client::{TogglService, basic_auth_header};
pub use models::{TogglClient, TogglProject};

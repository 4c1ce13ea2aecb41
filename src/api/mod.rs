//! API layer
//!
//! HTTP handlers for:
//! - Page data (reading list, projects, scene)
//! - Metrics (Prometheus)

pub mod metrics;
mod pages;

pub use metrics::metrics_router;
pub use pages::pages_router;

//! Bookmarks Module
//!
//! A self-contained feature module for saving URLs and enriching them with
//! embed metadata from an external lookup service, restricted to an
//! allow-list of domains.
//!
//! # Features
//!
//! - Allowed-domain validation (public-suffix aware, subdomains accepted)
//! - Create pipeline: input transformer, then embed enricher
//! - Ready-to-use HTTP handlers and routes
//! - Database migrations included
//!
//! # Usage
//!
//! ```rust,ignore
//! use bokmerke::bookmarks;
//!
//! // Mount the routes
//! let app = Router::new()
//!     .nest("/bookmarks", bookmarks::routes())
//!     .with_state(app_state);
//! ```

mod handler;
pub mod pipeline;
mod routes;
pub mod validate;

// Re-export the routes function
pub use routes::routes;

/// Returns the migrations for the bookmarks module.
///
/// These should be run during application startup to ensure the database
/// schema is up to date.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}

//! NextDevs Site - server-rendered blog and admin console for Pick & Partner.
//!
//! Serves the public blog and a small admin console on top of a remote
//! blog/user REST API. Nothing is stored locally apart from an in-process
//! cache of the public post listing.
//!
//! # Architecture
//!
//! - **Api**: reqwest client for the remote API; admin calls forward the caller's token
//! - **Gate**: `require_admin` middleware consulting [`nextdevs_core::AccessGate`]
//! - **Render**: maud templates; post bodies go through [`nextdevs_core::ContentRenderer`]
//! - **Cache**: moka cache for public data + Cache-Control/ETag headers for CDNs
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud, except sanitized post bodies
//! - Image URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Strict Content-Security-Policy: no JavaScript at all
//! - X-Frame-Options: DENY prevents clickjacking
//! - The admin gate is advisory; the backend re-checks every admin call

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod forms;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;

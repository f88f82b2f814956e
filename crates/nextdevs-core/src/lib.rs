//! Core logic for the Pick & Partner content site.
//!
//! This crate provides:
//! - Post body rendering: plain text auto-paragraphing plus allow-list HTML sanitization
//! - The admin access gate: advisory role checks on decoded (unverified) bearer tokens
//! - Serde types for the remote blog/user REST API
//! - Admin search over post listings
//! - Shared error types
//!
//! Nothing in here performs I/O. Callers fetch tokens and content themselves and
//! pass them in explicitly.

pub mod content;
mod error;
pub mod gate;
pub mod model;
pub mod search;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Role string carried by administrator tokens.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Cookie (and legacy storage key) holding the bearer token.
pub const TOKEN_COOKIE_NAME: &str = "jwtToken";

pub use content::{AllowList, AmmoniaSanitizer, ContentRenderer, Sanitizer};
pub use error::{Error, Result};
pub use gate::{AccessDecision, AccessGate, ClaimSet, DenyReason, GateState, PageGate, Redirect};
pub use model::{
    ApiErrorBody, Author, BlogsData, BlogsResponse, DashboardStats, EXCERPT_MAX_CHARS, Pagination,
    Post, PostInput, PostPagination, Role, UserData, UsersData, UsersResponse, normalize_slug,
    parse_tags,
};

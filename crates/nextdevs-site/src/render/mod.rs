//! HTML rendering.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic escaping. The only pre-escaped dynamic markup is
//! a post body, which has already been through the content sanitizer.

pub mod account;
pub mod admin;
pub mod blog;
pub mod components;

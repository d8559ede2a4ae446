// retext-core/src/engines/mod.rs
//! Concrete implementations of the `TextSubstitutor` trait.
//!
//! * `plain_text`: bare strings, with URL-like values left alone.
//! * `html_text`: markup fragments, substituting inside text nodes only.
//!
//! License: MIT OR APACHE 2.0

pub mod html_text;
pub mod plain_text;

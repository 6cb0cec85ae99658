//! Utility functions.
//!
//! This module provides text helpers used by the presentation layer.

pub mod text;

pub use text::{shorten, visible_width};

//! Variables module for REST Harness
//!
//! This module provides `{{name}}` placeholder substitution against the
//! environment store, and capture rules that write response fields back into it.

pub mod capture;
pub mod error;
pub mod substitution;

pub use capture::{apply_captures, Capture, CaptureSource, JsonPath};
pub use error::VarError;
pub use substitution::{find_placeholders, missing_variables, substitute_variables};

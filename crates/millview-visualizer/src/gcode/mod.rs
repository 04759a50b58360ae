//! G-Code command model and text-level passes
//!
//! This module provides:
//! - The per-line command model
//! - Word and comment extraction
//! - The independent syntax validator
//! - Built-in program templates

pub mod command;
pub mod parser;
pub mod templates;
pub mod validator;

pub use command::*;
pub use parser::*;
pub use templates::*;
pub use validator::*;

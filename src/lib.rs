//! gradchat library.
//!
//! This module exports public APIs for testing and extension.

pub mod chat;
pub mod cli;
pub mod config;
pub mod markdown;
pub mod providers;
pub mod transcript;

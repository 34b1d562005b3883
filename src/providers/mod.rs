//! Remote inference provider implementations.

pub mod gradio;

pub use gradio::{GradioClient, GradioConfig, PredictError};

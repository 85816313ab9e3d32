//! Generation Service Port
//!
//! Abstract interface for text generation. The chat session only needs
//! "prompt in, text out"; which model answers is an adapter concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Sampling temperature used when the user has not changed it
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Options for a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature (0.0 - 1.0), passed through unmodified
    pub temperature: f32,
    /// Top-k sampling
    pub top_k: Option<u32>,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Maximum tokens to generate
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_k: Some(40),
            top_p: Some(0.8),
            max_output_tokens: Some(500),
        }
    }
}

/// Text generation interface
///
/// # Example
///
/// ```rust,ignore
/// use nilm::ports::GenerationService;
///
/// struct GeminiGenerator { /* ... */ }
///
/// #[async_trait]
/// impl GenerationService for GeminiGenerator {
///     async fn generate(&self, prompt: &str, options: &GenerationOptions)
///         -> Result<String, DomainError> {
///         // Call generateContent
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text for a fully composed prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, DomainError>;

    /// Get the provider name (e.g., "google", "relay")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

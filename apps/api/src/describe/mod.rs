//! Description generator. Turns a few keywords into a short and a long
//! opportunity description.
//!
//! The generator is a remote collaborator behind the `DescriptionGenerator`
//! trait. `AppState` holds an `Arc<dyn DescriptionGenerator>`; the default
//! backend calls the model through `llm_client`. There is no retry here: a
//! failed call is reported and the client may simply try again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::describe::prompts::{DESCRIPTION_PROMPT_TEMPLATE, DESCRIPTION_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

pub mod handlers;
pub mod prompts;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDescriptionInput {
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDescription {
    pub short_description: String,
    pub long_description: String,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("keywords are required")]
    EmptyKeywords,

    #[error("description generator is not configured")]
    Unconfigured,

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty {0}")]
    EmptyOutput(&'static str),
}

#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// `keywords` is already trimmed and non-empty.
    async fn generate(&self, keywords: &str) -> Result<GeneratedDescription, GenerateError>;
}

/// Validates the input, calls the generator once, and checks the output shape.
pub async fn generate_description(
    generator: &dyn DescriptionGenerator,
    input: &GenerateDescriptionInput,
) -> Result<GeneratedDescription, GenerateError> {
    let keywords = input.keywords.trim();
    if keywords.is_empty() {
        return Err(GenerateError::EmptyKeywords);
    }

    let generated = generator.generate(keywords).await?;

    let short_description = generated.short_description.trim();
    let long_description = generated.long_description.trim();
    if short_description.is_empty() {
        return Err(GenerateError::EmptyOutput("shortDescription"));
    }
    if long_description.is_empty() {
        return Err(GenerateError::EmptyOutput("longDescription"));
    }

    Ok(GeneratedDescription {
        short_description: short_description.to_string(),
        long_description: long_description.to_string(),
    })
}

/// Generator backed by the Anthropic Messages API.
pub struct LlmDescriptionGenerator {
    llm: LlmClient,
}

impl LlmDescriptionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

pub fn build_prompt(keywords: &str) -> String {
    DESCRIPTION_PROMPT_TEMPLATE.replace("{keywords}", keywords)
}

#[async_trait]
impl DescriptionGenerator for LlmDescriptionGenerator {
    async fn generate(&self, keywords: &str) -> Result<GeneratedDescription, GenerateError> {
        Ok(self
            .llm
            .call_json::<GeneratedDescription>(&build_prompt(keywords), DESCRIPTION_SYSTEM)
            .await?)
    }
}

/// Used when no API key is configured. Every call fails.
pub struct UnconfiguredGenerator;

#[async_trait]
impl DescriptionGenerator for UnconfiguredGenerator {
    async fn generate(&self, _keywords: &str) -> Result<GeneratedDescription, GenerateError> {
        Err(GenerateError::Unconfigured)
    }
}

//! Axum route handlers for the description generator.

use axum::{extract::State, Json};

use crate::describe::{generate_description, GenerateDescriptionInput, GeneratedDescription};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/descriptions/generate
///
/// Stateless: on failure nothing the client already typed is touched.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(input): AppJson<GenerateDescriptionInput>,
) -> Result<Json<GeneratedDescription>, AppError> {
    let generated = generate_description(state.generator.as_ref(), &input).await?;
    Ok(Json(generated))
}

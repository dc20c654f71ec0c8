//! Capability check for the admin surface.
//!
//! The admin endpoints are unauthenticated unless `ADMIN_TOKEN` is set. When
//! it is, callers must present it in the `x-admin-token` header.

use axum::http::HeaderMap;

use crate::errors::AppError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPolicy {
    Open,
    Token(String),
}

impl AdminPolicy {
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(t) if !t.trim().is_empty() => AdminPolicy::Token(t.trim().to_string()),
            _ => AdminPolicy::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AdminPolicy::Open)
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AppError> {
        match self {
            AdminPolicy::Open => Ok(()),
            AdminPolicy::Token(expected) => {
                let presented = headers
                    .get(ADMIN_TOKEN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::trim);
                if presented.is_some_and(|p| tokens_match(p, expected)) {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
        }
    }
}

/// Compares every byte regardless of where the first mismatch is.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

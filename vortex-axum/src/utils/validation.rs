//! Input sanitation and required-field collection.
//!
//! Every string that reaches the access gate or the Vortex client goes
//! through [`sanitize`] first. Required-field checks report every missing
//! field at once rather than stopping at the first.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Hard cap on any single inbound string value.
pub const MAX_VALUE_LEN: usize = 1000;

/// Trim, strip `< > ' "`, truncate to [`MAX_VALUE_LEN`]. An empty result is
/// treated as absent.
pub fn sanitize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"'))
        .take(MAX_VALUE_LEN)
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Collects the names of required fields that are missing or empty after
/// sanitation, so the failure can list all of them.
#[derive(Debug, Default)]
pub struct FieldErrors {
    missing: Vec<&'static str>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize a required field, recording it as missing when absent or
    /// empty after sanitation.
    pub fn require(&mut self, name: &'static str, value: Option<&str>) -> Option<String> {
        match value.and_then(sanitize) {
            Some(clean) => Some(clean),
            None => {
                self.missing.push(name);
                None
            }
        }
    }

    pub fn check(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Sanitize a batch of ids. The list must be non-empty, and sanitation must
/// not shrink it: an entry that sanitizes to empty rejects the whole request
/// rather than being dropped.
pub fn sanitize_batch(ids: &[String], field: &str) -> Result<Vec<String>, AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!(
            "{} must be a non-empty list",
            field
        )));
    }

    let cleaned: Vec<String> = ids.iter().filter_map(|id| sanitize(id)).collect();
    if cleaned.len() != ids.len() {
        return Err(AppError::Validation(format!(
            "{} contains empty or invalid entries",
            field
        )));
    }

    Ok(cleaned)
}

/// JSON body extractor that reports parse failures in the uniform error
/// envelope instead of axum's plain-text rejection.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))?;
        Ok(AppJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_whitespace() {
        assert_eq!(sanitize("  a@b.com  "), Some("a@b.com".to_string()));
    }

    #[test]
    fn sanitize_strips_dangerous_characters() {
        assert_eq!(
            sanitize("<script>'x'</script>"),
            Some("scriptx/script".to_string())
        );
        assert_eq!(sanitize("<b>\"hi\"</b>"), Some("bhi/b".to_string()));
        assert_eq!(sanitize("it's"), Some("its".to_string()));
    }

    #[test]
    fn sanitize_is_idempotent_on_clean_input() {
        let clean = sanitize("a@b.com").unwrap();
        assert_eq!(sanitize(&clean), Some(clean.clone()));
    }

    #[test]
    fn sanitize_treats_empty_as_absent() {
        assert_eq!(sanitize("   "), None);
        assert_eq!(sanitize("\"\""), None);
        assert_eq!(sanitize("<>"), None);
    }

    #[test]
    fn sanitize_truncates_long_values() {
        let long = "x".repeat(MAX_VALUE_LEN + 50);
        assert_eq!(sanitize(&long).unwrap().len(), MAX_VALUE_LEN);
    }

    #[test]
    fn field_errors_lists_every_missing_field() {
        let mut fields = FieldErrors::new();
        fields.require("creatorId", None);
        fields.require("targetValue", Some("v"));
        fields.require("componentId", Some("  "));

        let err = fields.check().unwrap_err();
        match err {
            AppError::Validation(message) => {
                assert_eq!(message, "Missing required fields: creatorId, componentId");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn batch_rejects_empty_list() {
        let err = sanitize_batch(&[], "invitationIds").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn batch_never_shrinks_silently() {
        let ids = vec!["i1".to_string(), "  ".to_string(), "i3".to_string()];
        let err = sanitize_batch(&ids, "invitationIds").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn batch_passes_clean_ids_through() {
        let ids = vec![" i1 ".to_string(), "i2".to_string()];
        assert_eq!(
            sanitize_batch(&ids, "invitationIds").unwrap(),
            vec!["i1".to_string(), "i2".to_string()]
        );
    }
}

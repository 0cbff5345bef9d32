use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// Non-empty snapshot input that is either not JSON at all, or JSON that
    /// matches neither the flat nor the host-grouped layout.
    #[error("Malformed cookie snapshot: {reason}")]
    MalformedSnapshot {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Cookie snapshot is {size} bytes, limit is {limit}")]
    SnapshotTooLarge { size: usize, limit: usize },

    #[error("Invalid cookie host: {0:?}")]
    InvalidHost(String),

    #[error("Timestamp {0} cannot be stored in a snapshot")]
    InvalidTimestamp(OffsetDateTime),

    #[error("Cannot encode cookie snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CookieError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CookieError::MalformedSnapshot {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn unparsable(err: serde_json::Error) -> Self {
        CookieError::MalformedSnapshot {
            reason: "input is not valid JSON".to_string(),
            source: Some(err),
        }
    }

    /// Returns true for the `MalformedSnapshot` variant.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CookieError::MalformedSnapshot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unparsable_keeps_parse_diagnostic_as_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json at all").unwrap_err();
        let err = CookieError::unparsable(parse_err);

        assert!(err.is_malformed());
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Malformed cookie snapshot"));
    }

    #[test]
    fn shapeless_input_has_no_source() {
        let err = CookieError::malformed("expected an array or an object, found a number");
        assert!(err.is_malformed());
        assert!(err.source().is_none());
    }
}

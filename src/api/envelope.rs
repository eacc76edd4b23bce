//! Response envelope decoding.
//!
//! Every method answers with the same envelope: optional `info`, `warning` and
//! `error` strings next to a method-specific result field. The envelope is decoded
//! once into an [`Outcome`] so callers never inspect raw JSON.

use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;
use serde_json::Value;

use crate::transport::Method;

/// Informational fields carried by any envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Advisories {
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Advisories {
    /// Log every present field at its own level. Never blocks the flow.
    pub fn log(&self, method: Method, user_id: Option<i64>) {
        if let Some(info) = &self.info {
            tracing::info!(method = %method, user_id = ?user_id, "{}", info);
        }
        if let Some(warning) = &self.warning {
            tracing::warn!(method = %method, user_id = ?user_id, "{}", warning);
        }
        if let Some(error) = &self.error {
            tracing::error!(method = %method, user_id = ?user_id, "{}", error);
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A method-specific result field inside an envelope.
pub trait Payload {
    type Output;

    /// The result value, if the service sent one.
    fn into_output(self) -> Option<Self::Output>;
}

/// `check` answers with a boolean `skip`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkipPayload {
    #[serde(default)]
    pub skip: Option<bool>,
}

impl Payload for SkipPayload {
    type Output = bool;

    fn into_output(self) -> Option<bool> {
        self.skip
    }
}

/// Every other method answers with a `result` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ResultPayload<T> {
    #[serde(default)]
    pub result: Option<T>,
}

impl<T> Default for ResultPayload<T> {
    fn default() -> Self {
        Self { result: None }
    }
}

impl<T> Payload for ResultPayload<T> {
    type Output = T;

    fn into_output(self) -> Option<T> {
        self.result
    }
}

/// A decoded response envelope.
#[derive(Debug, Clone)]
pub struct Envelope<P> {
    pub advisories: Advisories,
    pub payload: P,
}

/// Interpretation of an envelope for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The expected result field was present.
    Payload(T),
    /// No result field and no error: the operation picks its own default.
    Empty,
    /// The service explicitly rejected the request.
    Rejected(String),
}

impl<P: Payload> Envelope<P> {
    /// Decode a raw body into a typed envelope.
    ///
    /// Advisories are decoded first. When `error` is set, a result field of the
    /// wrong shape counts as absent so the rejection still surfaces.
    pub fn decode(body: Value) -> Result<Self, serde_json::Error>
    where
        P: DeserializeOwned + Default,
    {
        if !body.is_object() {
            return Err(serde_json::Error::custom("expected a JSON object"));
        }

        let advisories = Advisories::deserialize(&body)?;
        match serde_json::from_value::<P>(body) {
            Ok(payload) => Ok(Self { advisories, payload }),
            Err(e) if advisories.has_error() => {
                tracing::debug!(error = %e, "Ignoring unusable result next to an error");
                Ok(Self {
                    advisories,
                    payload: P::default(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Collapse into an [`Outcome`]. `Rejected` only when `error` is set and the
    /// result field is missing or unusable.
    pub fn into_outcome(self) -> Outcome<P::Output> {
        match (self.payload.into_output(), self.advisories.error) {
            (Some(value), _) => Outcome::Payload(value),
            (None, Some(message)) => Outcome::Rejected(message),
            (None, None) => Outcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::LogCapture;
    use serde_json::json;
    use tracing::Level;

    #[test]
    fn test_skip_true() {
        let envelope = Envelope::<SkipPayload>::decode(json!({"skip": true})).unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Payload(true));
    }

    #[test]
    fn test_error_without_result_is_rejected() {
        let envelope = Envelope::<SkipPayload>::decode(json!({"error": "bad key"})).unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Rejected("bad key".to_string()));

        let envelope =
            Envelope::<ResultPayload<Vec<Value>>>::decode(json!({"error": "bad key"})).unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Rejected("bad key".to_string()));
    }

    #[test]
    fn test_error_with_result_keeps_result() {
        let envelope =
            Envelope::<SkipPayload>::decode(json!({"error": "quota", "skip": false})).unwrap();
        assert!(envelope.advisories.has_error());
        assert_eq!(envelope.into_outcome(), Outcome::Payload(false));
    }

    #[test]
    fn test_empty_envelope() {
        let envelope =
            Envelope::<ResultPayload<String>>::decode(json!({"info": "hello"})).unwrap();
        assert_eq!(envelope.advisories.info.as_deref(), Some("hello"));
        assert_eq!(envelope.into_outcome(), Outcome::Empty);
    }

    #[test]
    fn test_null_result_is_empty() {
        let envelope = Envelope::<ResultPayload<String>>::decode(json!({"result": null})).unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Empty);
    }

    #[test]
    fn test_wrong_shape_fails_to_decode() {
        assert!(Envelope::<SkipPayload>::decode(json!({"skip": "yes"})).is_err());
        assert!(Envelope::<SkipPayload>::decode(json!(["not", "an", "object"])).is_err());
        assert!(Envelope::<SkipPayload>::decode(json!({"error": 42})).is_err());
    }

    #[test]
    fn test_error_with_unusable_result_is_rejected() {
        let envelope =
            Envelope::<SkipPayload>::decode(json!({"error": "bad key", "skip": "weird"})).unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Rejected("bad key".to_string()));

        let envelope = Envelope::<ResultPayload<Vec<Value>>>::decode(
            json!({"error": "bad key", "result": {"not": "a list"}}),
        )
        .unwrap();
        assert_eq!(envelope.into_outcome(), Outcome::Rejected("bad key".to_string()));
    }

    #[test]
    fn test_advisories_logged_at_own_level() {
        let logs = LogCapture::new();
        let advisories = Advisories {
            info: Some("new campaign".to_string()),
            warning: Some("limit capped".to_string()),
            error: Some("bot is not verified".to_string()),
        };

        logs.capture(|| advisories.log(Method::Check, Some(123)));

        assert_eq!(logs.level_of("new campaign"), Some(Level::INFO));
        assert_eq!(logs.level_of("limit capped"), Some(Level::WARN));
        assert_eq!(logs.level_of("bot is not verified"), Some(Level::ERROR));
        assert_eq!(logs.events().len(), 3);
    }
}

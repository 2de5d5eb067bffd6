//! Actions describing requested state changes.

use super::value::Value;
use crate::error::{Result, StoreError};
use std::any::Any;
use std::fmt;

/// Immutable request to change state: a type tag plus an optional payload.
///
/// The tag is trimmed on construction and can never be empty. Reducers
/// usually switch on [`Action::kind`] and read the payload with
/// [`Action::payload_or`].
///
/// # Example
///
/// ```rust
/// use unistate::core::Action;
///
/// let action = Action::with_payload("  INCREMENT ", 5_i32).unwrap();
///
/// assert_eq!(action.kind(), "INCREMENT");
/// assert!(action.payload_is::<i32>());
/// assert_eq!(action.payload_or(1_i32).unwrap(), 5);
///
/// assert!(Action::new("   ").is_err());
/// ```
#[derive(Clone)]
pub struct Action {
    kind: String,
    payload: Option<Value>,
}

impl Action {
    /// Create an action without a payload.
    pub fn new(kind: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            kind: validate_kind(kind.as_ref())?,
            payload: None,
        })
    }

    /// Create an action carrying `payload`.
    pub fn with_payload<T: Any + Send + Sync>(kind: impl AsRef<str>, payload: T) -> Result<Self> {
        Self::with_value(kind, Some(Value::new(payload)))
    }

    /// Create an action from an already type-erased payload.
    pub fn with_value(kind: impl AsRef<str>, payload: Option<Value>) -> Result<Self> {
        Ok(Self {
            kind: validate_kind(kind.as_ref())?,
            payload,
        })
    }

    /// The trimmed type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The attached payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Runtime type name of the payload, present iff the payload is.
    pub fn payload_type(&self) -> Option<&'static str> {
        self.payload.as_ref().map(Value::type_name)
    }

    /// Whether a payload is attached.
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Whether the payload can be read as a `T`.
    ///
    /// Always true when there is no payload, since there is nothing to
    /// violate.
    pub fn payload_is<T: Any>(&self) -> bool {
        self.payload.as_ref().is_none_or(Value::is::<T>)
    }

    /// The payload as a `T`, or `default` when there is no payload.
    ///
    /// The payload type is not checked up front; a payload of another type
    /// fails at the cast with [`StoreError::TypeMismatch`].
    pub fn payload_or<T: Any + Clone>(&self, default: T) -> Result<T> {
        match &self.payload {
            Some(value) => value.downcast(),
            None => Ok(default),
        }
    }

    /// The raw payload, if any.
    pub fn payload_or_null(&self) -> Option<Value> {
        self.payload.clone()
    }
}

fn validate_kind(kind: &str) -> Result<String> {
    let trimmed = kind.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidArgument(
            "action type must not be empty or entirely whitespace".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "Action [type='{}', payload='{payload}']", self.kind),
            None => write!(f, "Action [type='{}', payload='null']", self.kind),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_trimmed() {
        let action = Action::new("\t LOAD \n").unwrap();
        assert_eq!(action.kind(), "LOAD");
    }

    #[test]
    fn empty_and_blank_kinds_are_rejected() {
        for kind in ["", " ", "\t\n", "   \r "] {
            let result = Action::new(kind);
            assert!(
                matches!(result, Err(StoreError::InvalidArgument(_))),
                "'{kind:?}' should be rejected"
            );
        }
        assert!(Action::with_payload("", 1_i32).is_err());
    }

    #[test]
    fn payload_type_tracks_payload() {
        let bare = Action::new("A").unwrap();
        assert!(!bare.has_payload());
        assert_eq!(bare.payload_type(), None);
        assert!(bare.payload_or_null().is_none());

        let loaded = Action::with_payload("A", String::from("x")).unwrap();
        assert!(loaded.has_payload());
        assert_eq!(loaded.payload_type(), Some(std::any::type_name::<String>()));
    }

    #[test]
    fn payload_is_true_without_payload() {
        let bare = Action::new("A").unwrap();

        assert!(bare.payload_is::<i32>());
        assert!(bare.payload_is::<String>());
    }

    #[test]
    fn payload_is_checks_runtime_type() {
        let action = Action::with_payload("A", 3_u64).unwrap();

        assert!(action.payload_is::<u64>());
        assert!(!action.payload_is::<i32>());
    }

    #[test]
    fn payload_or_uses_default_only_when_absent() {
        let bare = Action::new("A").unwrap();
        assert_eq!(bare.payload_or(1_i32).unwrap(), 1);

        let loaded = Action::with_payload("A", 10_i32).unwrap();
        assert_eq!(loaded.payload_or(1_i32).unwrap(), 10);
    }

    #[test]
    fn payload_or_fails_at_the_cast() {
        let action = Action::with_payload("A", "text").unwrap();

        assert!(matches!(
            action.payload_or(0_i32),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn display_includes_type_and_payload() {
        let action = Action::with_payload("SET", 4_i32).unwrap();
        assert_eq!(action.to_string(), "Action [type='SET', payload='4']");

        let bare = Action::new("RESET").unwrap();
        assert_eq!(bare.to_string(), "Action [type='RESET', payload='null']");
    }
}

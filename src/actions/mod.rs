//! Entry points invoked by pages, the CLI and webhook handlers.
//!
//! Mutating actions validate untrusted input, delegate to services or
//! repositories, revalidate dependent views and answer with an
//! [`ActionResult`]. They are the only layer that turns failures into a
//! user-facing message; the underlying error is logged, never returned.
//! Read actions hand back data or absence and propagate errors.

mod examples;
mod organizations;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::cache::ViewCache;
use crate::repositories::Backend;

pub use examples::{
    MSG_EXAMPLE_CREATE_FAILED, MSG_EXAMPLE_DELETE_FAILED, MSG_EXAMPLE_NOT_FOUND, MSG_EXAMPLE_UPDATE_FAILED,
    MSG_MARKUP_FAILED,
};
pub use organizations::{MSG_ORGANIZATION_PROVISION_FAILED, MSG_ORGANIZATION_UPDATE_FAILED};

/// Uniform outcome of a mutating action.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        ActionResult::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ActionResult::Success(data) => Some(data),
            ActionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Failure(message) => Some(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Success(data) => Ok(data),
            ActionResult::Failure(message) => Err(message),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            ActionResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ActionResult::Failure(message) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", message)?;
            }
        }
        state.end()
    }
}

/// Action surface shared by every entry point.
#[derive(Clone)]
pub struct Actions {
    backend: Arc<dyn Backend>,
    cache: ViewCache,
    markup_factor: Decimal,
}

impl Actions {
    pub fn new(backend: Arc<dyn Backend>, cache: ViewCache, markup_factor: Decimal) -> Self {
        Self {
            backend,
            cache,
            markup_factor,
        }
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_has_exactly_one_payload_key() {
        let ok: ActionResult<u32> = ActionResult::Success(7);
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "success": true, "data": 7 }));

        let err: ActionResult<u32> = ActionResult::failure("Nome obrigatório");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "success": false, "error": "Nome obrigatório" })
        );
    }

    #[test]
    fn accessors_match_variant() {
        let ok: ActionResult<&str> = ActionResult::Success("x");
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&"x"));
        assert_eq!(ok.error(), None);

        let err: ActionResult<&str> = ActionResult::failure("nope");
        assert!(!err.is_success());
        assert_eq!(err.clone().into_result(), Err("nope".to_string()));
        assert_eq!(err.error(), Some("nope"));
    }
}

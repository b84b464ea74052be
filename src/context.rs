use uuid::Uuid;

use crate::database::client::Privilege;

/// Request-scoped identity passed explicitly through actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    user_id: Option<Uuid>,
}

impl RequestContext {
    /// Trusted server-side caller (webhooks, maintenance)
    pub fn service() -> Self {
        Self { user_id: None }
    }

    /// Authenticated end user; storage applies row-level policy
    pub fn user(user_id: Uuid) -> Self {
        Self { user_id: Some(user_id) }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn privilege(&self) -> Privilege {
        match self.user_id {
            Some(id) => Privilege::User(id),
            None => Privilege::Service,
        }
    }
}

use stocktrace_auth::Role;
use stocktrace_core::ActorId;

/// Actor context for a request (resolved identity + roles).
///
/// This is immutable and must be present for all domain routes. It is built by
/// the middleware from identity headers the external directory service
/// resolved; the API never authenticates credentials itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    actor_id: ActorId,
    roles: Vec<Role>,
}

impl ActorContext {
    pub fn new(actor_id: ActorId, roles: Vec<Role>) -> Self {
        Self { actor_id, roles }
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

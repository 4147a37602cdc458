use std::collections::HashSet;

use thiserror::Error;

use stocktrace_core::ActorId;

use crate::{Permission, Role};

/// A fully resolved actor for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API layer derives it from the identity the directory service
/// resolved, plus a policy source mapping roles to permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub actor_id: ActorId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Operation-side authorization contract (checked at the boundary).
///
/// Implement this on request-shaped operations that require permissions.
/// The API layer enforces these requirements before invoking services;
/// the stock engine itself stays auth-agnostic.
pub trait OperationAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// Authorize an actor against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(actor: &Actor, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = actor.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_with(perms: &[&'static str]) -> Actor {
        Actor {
            actor_id: ActorId::new(),
            roles: vec![Role::new("manager")],
            permissions: perms.iter().map(|p| Permission::new(*p)).collect(),
        }
    }

    #[test]
    fn wildcard_grants_everything() {
        let actor = actor_with(&["*"]);
        assert!(authorize(&actor, &Permission::new("inventory.items.delete")).is_ok());
    }

    #[test]
    fn explicit_permission_grants_only_itself() {
        let actor = actor_with(&["inventory.items.create"]);
        assert!(authorize(&actor, &Permission::new("inventory.items.create")).is_ok());

        let err = authorize(&actor, &Permission::new("inventory.items.delete")).unwrap_err();
        match err {
            AuthzError::Forbidden(p) => assert_eq!(p, "inventory.items.delete"),
        }
    }

    #[test]
    fn no_permissions_denies() {
        let actor = actor_with(&[]);
        assert!(authorize(&actor, &Permission::new("inventory.items.create")).is_err());
    }
}

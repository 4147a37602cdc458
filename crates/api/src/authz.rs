//! API-side authorization guard for operations.
//!
//! Authorization is enforced at the request boundary (before a service call),
//! keeping the stock engine and stores auth-agnostic.

use stocktrace_auth::{Actor, AuthzError, OperationAuthorization, Permission, authorize};

use crate::context::ActorContext;

/// Check authorization for an operation in the current request context.
///
/// This is intended to be called **before** invoking the service.
pub fn authorize_operation<O: OperationAuthorization>(
    actor: &ActorContext,
    operation: &O,
) -> Result<(), AuthzError> {
    let resolved = Actor {
        actor_id: actor.actor_id(),
        roles: actor.roles().to_vec(),
        permissions: permissions_from_roles(actor.roles()),
    };

    for perm in operation.required_permissions() {
        authorize(&resolved, perm)?;
    }

    Ok(())
}

/// Role→permission mapping.
///
/// Convention: "admin" grants all permissions; "manager" covers the
/// create/update/adjust surface. Any other role is read-only (reads require no
/// permission, only a resolved actor).
pub fn permissions_from_roles(roles: &[stocktrace_auth::Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == "admin") {
        return vec![Permission::new("*")];
    }

    if roles.iter().any(|r| r.as_str() == "manager") {
        return vec![
            Permission::new("inventory.items.create"),
            Permission::new("inventory.items.update"),
            Permission::new("inventory.items.adjust"),
            Permission::new("inventory.categories.create"),
            Permission::new("inventory.categories.update"),
        ];
    }

    Vec::new()
}

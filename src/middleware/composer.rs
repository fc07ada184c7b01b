//! Middleware composition.
//!
//! Every route's middleware chain is either derived automatically from its
//! operation metadata or declared explicitly alongside the route. Both paths
//! go through [`chain_for`], which validates the ordering rules at startup so
//! a misassembled chain fails the boot instead of a request.

use axum::{middleware::from_fn_with_state, routing::MethodRouter};

use gatehouse_core::registry::OperationMeta;

use crate::middleware::{auth, audit, operation, org_context, rbac, request_id, team_context};
use crate::state::AppState;

/// One stage of a route's middleware chain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddlewareKind {
    RequestId,
    OperationId,
    Auth,
    OrgContext { optional: bool },
    TeamContext { optional: bool },
    Rbac,
    Audit,
}

impl MiddlewareKind {
    fn name(&self) -> &'static str {
        match self {
            MiddlewareKind::RequestId => "RequestId",
            MiddlewareKind::OperationId => "OperationId",
            MiddlewareKind::Auth => "Auth",
            MiddlewareKind::OrgContext { .. } => "OrgContext",
            MiddlewareKind::TeamContext { .. } => "TeamContext",
            MiddlewareKind::Rbac => "Rbac",
            MiddlewareKind::Audit => "Audit",
        }
    }

    fn requires_auth(&self) -> bool {
        matches!(
            self,
            MiddlewareKind::OrgContext { .. }
                | MiddlewareKind::TeamContext { .. }
                | MiddlewareKind::Rbac
                | MiddlewareKind::Audit
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("{operation}: {stage} appears more than once")]
    Duplicate {
        operation: String,
        stage: &'static str,
    },
    #[error("{operation}: {stage} requires {missing} earlier in the chain")]
    MissingPredecessor {
        operation: String,
        stage: &'static str,
        missing: &'static str,
    },
    #[error("{operation} is public but its chain includes {stage}")]
    AuthOnPublicRoute {
        operation: String,
        stage: &'static str,
    },
    #[error("{operation} is audited but its chain has no Audit stage")]
    MissingAudit { operation: String },
    #[error("{operation} is not audited but its chain includes Audit")]
    UnexpectedAudit { operation: String },
}

/// Resolves a route's chain. With no declaration the chain is derived from
/// the operation's metadata; a declared chain is validated against the same
/// ordering rules, with RequestId and OperationId prepended when omitted.
pub fn chain_for(
    meta: &OperationMeta,
    declared: Option<&[MiddlewareKind]>,
) -> Result<Vec<MiddlewareKind>, ComposeError> {
    let chain = match declared {
        Some(declared) => {
            let mut chain = Vec::with_capacity(declared.len() + 2);
            if !declared.contains(&MiddlewareKind::RequestId) {
                chain.push(MiddlewareKind::RequestId);
            }
            if !declared.contains(&MiddlewareKind::OperationId) {
                chain.push(MiddlewareKind::OperationId);
            }
            chain.extend_from_slice(declared);
            chain
        }
        None => auto_chain(meta),
    };
    validate(meta, &chain)?;
    Ok(chain)
}

fn auto_chain(meta: &OperationMeta) -> Vec<MiddlewareKind> {
    let mut chain = vec![MiddlewareKind::RequestId, MiddlewareKind::OperationId];
    if !meta.is_public {
        chain.push(MiddlewareKind::Auth);
        if meta.needs_org_context {
            chain.push(MiddlewareKind::OrgContext { optional: false });
        }
        if meta.needs_team_context {
            // Reads are visible to any org member; writes require team
            // membership resolved strictly.
            chain.push(MiddlewareKind::TeamContext {
                optional: meta.is_read_only,
            });
        }
        chain.push(MiddlewareKind::Rbac);
    }
    if meta.audited {
        chain.push(MiddlewareKind::Audit);
    }
    chain
}

fn validate(meta: &OperationMeta, chain: &[MiddlewareKind]) -> Result<(), ComposeError> {
    let operation = meta.operation.as_str().to_string();

    let mut seen: Vec<&'static str> = Vec::with_capacity(chain.len());
    for kind in chain {
        if seen.contains(&kind.name()) {
            return Err(ComposeError::Duplicate {
                operation: operation.clone(),
                stage: kind.name(),
            });
        }

        if meta.is_public && (kind.requires_auth() || *kind == MiddlewareKind::Auth) {
            return Err(ComposeError::AuthOnPublicRoute {
                operation: operation.clone(),
                stage: kind.name(),
            });
        }
        if kind.requires_auth() && !seen.contains(&"Auth") {
            return Err(ComposeError::MissingPredecessor {
                operation: operation.clone(),
                stage: kind.name(),
                missing: "Auth",
            });
        }
        if matches!(kind, MiddlewareKind::TeamContext { .. }) && !seen.contains(&"OrgContext") {
            return Err(ComposeError::MissingPredecessor {
                operation: operation.clone(),
                stage: kind.name(),
                missing: "OrgContext",
            });
        }
        // Enforcement and capture stages act on resolved scopes, so any
        // context stage in the chain must run before them.
        if matches!(
            kind,
            MiddlewareKind::OrgContext { .. } | MiddlewareKind::TeamContext { .. }
        ) {
            for stage in ["Rbac", "Audit"] {
                if seen.contains(&stage) {
                    return Err(ComposeError::MissingPredecessor {
                        operation: operation.clone(),
                        stage,
                        missing: kind.name(),
                    });
                }
            }
        }
        if matches!(kind, MiddlewareKind::Rbac | MiddlewareKind::Audit)
            && !seen.contains(&"OperationId")
        {
            return Err(ComposeError::MissingPredecessor {
                operation: operation.clone(),
                stage: kind.name(),
                missing: "OperationId",
            });
        }

        seen.push(kind.name());
    }

    if meta.audited && !seen.contains(&"Audit") {
        return Err(ComposeError::MissingAudit {
            operation: operation.clone(),
        });
    }
    if !meta.audited && seen.contains(&"Audit") {
        return Err(ComposeError::UnexpectedAudit { operation });
    }

    Ok(())
}

/// Wraps a route's handler in its chain. Layers are applied in reverse so the
/// first kind in the chain is the first to see the request.
pub fn apply(
    chain: &[MiddlewareKind],
    state: &AppState,
    handler: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    chain.iter().rev().fold(handler, |router, kind| match kind {
        MiddlewareKind::RequestId => {
            router.layer(axum::middleware::from_fn(request_id::request_id))
        }
        MiddlewareKind::OperationId => {
            router.layer(from_fn_with_state(state.clone(), operation::operation_id))
        }
        MiddlewareKind::Auth => {
            router.layer(from_fn_with_state(state.clone(), auth::authenticate))
        }
        MiddlewareKind::OrgContext { optional: false } => {
            router.layer(from_fn_with_state(state.clone(), org_context::org_context))
        }
        MiddlewareKind::OrgContext { optional: true } => router.layer(from_fn_with_state(
            state.clone(),
            org_context::org_context_optional,
        )),
        MiddlewareKind::TeamContext { optional: false } => {
            router.layer(from_fn_with_state(state.clone(), team_context::team_context))
        }
        MiddlewareKind::TeamContext { optional: true } => router.layer(from_fn_with_state(
            state.clone(),
            team_context::team_context_optional,
        )),
        MiddlewareKind::Rbac => router.layer(axum::middleware::from_fn(rbac::rbac)),
        MiddlewareKind::Audit => router.layer(from_fn_with_state(state.clone(), audit::audit)),
    })
}

//! Authorization seam.
//!
//! The engine calls an external authorization collaborator before every
//! mutating operation. The contract is a single boolean check; a `false`
//! answer short-circuits the operation with no side effects and no
//! information about whether the referenced records exist.

use std::collections::HashSet;

use uuid::Uuid;

/// The functional area a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// Payroll runs and their computation.
    Payroll,
    /// The review/approval pipeline.
    PayrollReview,
}

/// The operation class being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read-only access.
    View,
    /// Creating or recomputing records.
    Update,
    /// Removing records.
    Delete,
    /// Giving a review verdict.
    Approve,
}

/// The caller of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The tenant the user is operating in.
    pub tenant_id: Uuid,
}

/// External permission check.
pub trait Authorizer: Send + Sync {
    /// Returns true if `user` may perform `action` on `module` within
    /// `tenant`.
    fn is_allowed(&self, user: Uuid, tenant: Uuid, module: Module, action: Action) -> bool;
}

/// Grants everything. For tests and single-operator deployments.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_allowed(&self, _user: Uuid, _tenant: Uuid, _module: Module, _action: Action) -> bool {
        true
    }
}

/// A fixed grant table.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    grants: HashSet<(Uuid, Uuid, Module, Action)>,
}

impl StaticPermissions {
    /// Creates an empty (deny-everything) table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants one (user, tenant, module, action) tuple.
    pub fn grant(mut self, user: Uuid, tenant: Uuid, module: Module, action: Action) -> Self {
        self.grants.insert((user, tenant, module, action));
        self
    }
}

impl Authorizer for StaticPermissions {
    fn is_allowed(&self, user: Uuid, tenant: Uuid, module: Module, action: Action) -> bool {
        self.grants.contains(&(user, tenant, module, action))
    }
}

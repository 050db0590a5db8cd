//! Caller identity supplied by the authentication collaborator.

use std::collections::BTreeSet;

pub type UserId = i64;
pub type ProjectId = i64;

/// The authenticated user a query is built for, together with the ids of
/// every project the user is a member of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub project_ids: BTreeSet<ProjectId>,
}

impl Caller {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            project_ids: BTreeSet::new(),
        }
    }

    pub fn with_projects<I: IntoIterator<Item = ProjectId>>(id: UserId, project_ids: I) -> Self {
        Self {
            id,
            project_ids: project_ids.into_iter().collect(),
        }
    }

    pub fn is_member_of(&self, project_id: ProjectId) -> bool {
        self.project_ids.contains(&project_id)
    }
}

/// Source of the current caller, e.g. a login session.
pub trait AuthContext {
    /// Returns `None` when nobody is authenticated.
    fn caller(&self) -> Option<Caller>;
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    caller: Option<Caller>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    pub fn authenticated(caller: Caller) -> Self {
        Self { caller: Some(caller) }
    }
}

impl AuthContext for Session {
    fn caller(&self) -> Option<Caller> {
        self.caller.clone()
    }
}

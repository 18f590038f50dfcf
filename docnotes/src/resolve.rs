//! Name resolution inside a declaring scope.
//!
//! The registry never inspects a host's live members itself. Instead, a host
//! implements [`Resolve`] to answer "what does this name refer to". Hosts without
//! their own introspection can use [`MemberTable`], which is filled in as members
//! get declared.

use std::collections::{HashMap, HashSet};

use crate::subject::{MemberKind, Subject};

/// Answers name queries about one declaring scope.
pub trait Resolve {
    /// Resolves a constant-style name (one that starts with an uppercase letter).
    ///
    /// Returns `None` when no such constant exists (yet).
    fn resolve_by_name(&self, name: &str) -> Option<Subject>;

    /// Whether the scope has an instance member called `name`.
    fn has_instance_member(&self, name: &str) -> bool;

    /// Whether the scope has a scope-level member called `name`.
    fn has_scope_member(&self, name: &str) -> bool;
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve_by_name(&self, name: &str) -> Option<Subject> {
        (**self).resolve_by_name(name)
    }

    fn has_instance_member(&self, name: &str) -> bool {
        (**self).has_instance_member(name)
    }

    fn has_scope_member(&self, name: &str) -> bool {
        (**self).has_scope_member(name)
    }
}

/// A [`Resolve`] implementation backed by a table of declared names.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    constants: HashMap<String, Subject>,
    instance_members: HashSet<String>,
    scope_members: HashSet<String>,
}

impl MemberTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that member `name` was declared.
    pub fn insert_member(&mut self, name: impl Into<String>, kind: MemberKind) {
        let name = name.into();
        match kind {
            MemberKind::Instance => self.instance_members.insert(name),
            MemberKind::Scope => self.scope_members.insert(name),
        };
    }

    /// Records that constant `name` refers to `subject`.
    pub fn insert_constant(&mut self, name: impl Into<String>, subject: Subject) {
        self.constants.insert(name.into(), subject);
    }
}

impl Resolve for MemberTable {
    fn resolve_by_name(&self, name: &str) -> Option<Subject> {
        self.constants.get(name).cloned()
    }

    fn has_instance_member(&self, name: &str) -> bool {
        self.instance_members.contains(name)
    }

    fn has_scope_member(&self, name: &str) -> bool {
        self.scope_members.contains(name)
    }
}

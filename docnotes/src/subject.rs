use std::fmt::{self, Display, Formatter};

use crate::annotation::Kind;

/// Whether a member is called on instances of its scope or on the scope itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Called on an instance (`value.member()`).
    Instance,
    /// Called on the scope itself (`Scope::member()`), rendered with a `self.` prefix.
    Scope,
}

/// The identity of a declared callable.
///
/// Handles only name a member; they never keep the declaring scope alive or
/// borrowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberHandle {
    scope: String,
    name: String,
    kind: MemberKind,
}

impl MemberHandle {
    /// Creates a handle for member `name` of `scope`.
    pub fn new(scope: impl Into<String>, name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            kind,
        }
    }

    /// Name of the declaring scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Name of the member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance or scope member.
    pub fn kind(&self) -> MemberKind {
        self.kind
    }
}

/// A declared entity that can be documented.
///
/// Subjects are the keys of a [`Manual`](crate::Manual): two annotations belong
/// to the same subject exactly when their subjects compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A class-like type.
    Class(String),
    /// A module-like namespace.
    Module(String),
    /// A named constant value.
    Constant(String),
    /// A callable member of a scope.
    Member(MemberHandle),
}

impl Subject {
    /// The kind inferred for annotations on this subject.
    pub fn kind(&self) -> Kind {
        match self {
            Subject::Class(_) => Kind::Class,
            Subject::Module(_) => Kind::Module,
            Subject::Constant(_) => Kind::Unspecified,
            Subject::Member(handle) => match handle.kind() {
                MemberKind::Instance => Kind::InstanceMethod,
                MemberKind::Scope => Kind::ScopeMethod,
            },
        }
    }

    /// The name shown for this subject.
    pub fn display_name(&self) -> &str {
        match self {
            Subject::Class(name) | Subject::Module(name) | Subject::Constant(name) => name,
            Subject::Member(handle) => handle.name(),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Member(handle) => match handle.kind() {
                MemberKind::Instance => write!(f, "{}#{}", handle.scope(), handle.name()),
                MemberKind::Scope => write!(f, "{}.{}", handle.scope(), handle.name()),
            },
            other => f.write_str(other.display_name()),
        }
    }
}

impl From<MemberHandle> for Subject {
    fn from(value: MemberHandle) -> Self {
        Subject::Member(value)
    }
}

/// Whether `name` starts like a constant, i.e. with an uppercase letter.
pub(crate) fn is_constant_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether `name` can name a member or constant: an identifier of ASCII
/// alphanumerics and `_`, not starting with a digit.
pub(crate) fn is_name_like(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

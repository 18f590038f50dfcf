//! The registry of annotations of one declaring scope.

use std::collections::HashMap;

use crate::annotation::{Annotation, Body, Options};
use crate::resolve::Resolve;
use crate::subject::{is_constant_name, MemberHandle, MemberKind, Subject};

/// Maps resolved subjects of one scope to the annotations written for them.
///
/// Every subject owns its own sequence of annotations. Annotating a subject twice
/// keeps both records, in call order. Looking up a subject that was never
/// annotated yields an empty slice and leaves the manual untouched.
#[derive(Debug, Default)]
pub struct Manual {
    owner: String,
    annotations: HashMap<Subject, Vec<Annotation>>,
}

impl Manual {
    /// Creates an empty manual for the scope called `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            annotations: HashMap::new(),
        }
    }

    /// Name of the scope whose members this manual documents.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Resolves `name` to a subject of the owning scope.
    ///
    /// Constant-style names (starting with an uppercase letter) are resolved as
    /// constants. Other names are tried as instance members first, then as
    /// scope members. Returns `None` if nothing by that name was declared yet.
    pub fn resolve_subject<R: Resolve + ?Sized>(&self, resolver: &R, name: &str) -> Option<Subject> {
        if is_constant_name(name) {
            resolver.resolve_by_name(name)
        } else if resolver.has_instance_member(name) {
            Some(self.member(name, MemberKind::Instance))
        } else if resolver.has_scope_member(name) {
            Some(self.member(name, MemberKind::Scope))
        } else {
            None
        }
    }

    fn member(&self, name: &str, kind: MemberKind) -> Subject {
        Subject::Member(MemberHandle::new(self.owner.as_str(), name, kind))
    }

    /// Creates an annotation for `subject` and appends it to the subject's records.
    ///
    /// Missing `options` are filled in from the subject: the kind from its nature
    /// and the name from its display name.
    pub fn annotate(&mut self, subject: Subject, mut options: Options, body: Option<Body>) {
        options.kind.get_or_insert_with(|| subject.kind());
        let name = options
            .name
            .take()
            .unwrap_or_else(|| subject.display_name().to_string());

        log::debug!("annotating {subject} in {} as `{name}`", self.owner);
        let annotation = Annotation::new(name, options, body);
        self.annotations.entry(subject).or_default().push(annotation);
    }

    /// The annotations of the subject `name` resolves to.
    ///
    /// Unresolvable and undocumented names yield an empty slice.
    pub fn lookup<R: Resolve + ?Sized>(&self, resolver: &R, name: &str) -> &[Annotation] {
        log::trace!("looking up `{name}` in {}", self.owner);
        match self.resolve_subject(resolver, name) {
            Some(subject) => self.get(&subject),
            None => &[],
        }
    }

    /// The annotations registered for `subject`.
    pub fn get(&self, subject: &Subject) -> &[Annotation] {
        self.annotations
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All subjects that have at least one annotation.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.annotations.keys()
    }

    /// Whether nothing was annotated yet.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Erases every annotation.
    pub fn clear(&mut self) {
        log::debug!("clearing manual of {}", self.owner);
        self.annotations.clear();
    }
}

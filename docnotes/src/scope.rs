//! Declaring scopes and the deferred-registration protocol.
//!
//! A [`DocScope`] accepts [`Request`]s at any time relative to the declarations
//! they document:
//!
//! * requests for entities that are already declared are registered immediately;
//! * requests naming a member that does not exist yet are parked under that name
//!   until [`DocScope::on_member_declared`] reports it;
//! * requests without a target are queued, and each declaration event binds the
//!   oldest of them to the member that was just declared.
//!
//! ```rust
//! use docnotes::{DocScope, MemberKind, Request, Declarer};
//!
//! let mut scope = DocScope::new("Greeter");
//! scope.annotate(Request::next("Greets someone.")).unwrap();
//! scope.annotate(Request::of("farewell", "Says goodbye.")).unwrap();
//!
//! scope.declare_member("greet", MemberKind::Instance);
//! scope.declare_member("farewell", MemberKind::Instance);
//!
//! assert_eq!(scope.lookup("greet")[0].description(), Some("Greets someone."));
//! assert_eq!(scope.lookup("farewell")[0].description(), Some("Says goodbye."));
//! ```

use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::annotation::{Annotation, Options};
use crate::declare::{Declarer, Members};
use crate::manual::Manual;
use crate::render::{render_to, render_with, RenderSettings};
use crate::request::{AnnotateError, Classified, Pending, Request};
use crate::resolve::{MemberTable, Resolve};
use crate::subject::{MemberHandle, MemberKind, Subject};

/// A declaring scope: owns the [`Manual`] for its members together with the
/// requests that wait for members to be declared.
#[derive(Debug)]
pub struct DocScope<R = MemberTable> {
    name: String,
    resolver: R,
    manual: Option<Manual>,
    queued: VecDeque<Pending>,
    forward: HashMap<String, Vec<Pending>>,
}

impl DocScope<MemberTable> {
    /// Creates a scope that resolves names through its own [`MemberTable`].
    ///
    /// Members must then be reported through the [`Declarer`] implementation.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_resolver(name, MemberTable::new())
    }

    /// Creates a scope for `T`, named after [`Members::SCOPE_NAME`].
    ///
    /// Nothing is declared yet; call `T::declare_members(&mut scope)` once the
    /// annotations that should precede the declarations are in place.
    pub fn of<T: Members>() -> Self {
        Self::new(T::SCOPE_NAME)
    }

    /// Records a constant of this scope, so it can be documented and looked up by name.
    pub fn define_constant(&mut self, name: impl Into<String>, subject: Subject) {
        self.resolver.insert_constant(name, subject);
    }
}

impl<R: Resolve> DocScope<R> {
    /// Creates a scope that resolves names through `resolver`.
    pub fn with_resolver(name: impl Into<String>, resolver: R) -> Self {
        Self {
            name: name.into(),
            resolver,
            manual: None,
            queued: VecDeque::new(),
            forward: HashMap::new(),
        }
    }

    /// Name of this scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolver names are looked up with.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Mutable access to the resolver, for hosts that keep their own declaration table.
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// The manual of this scope, created on first use.
    pub fn manual(&mut self) -> &mut Manual {
        self.manual
            .get_or_insert_with(|| Manual::new(self.name.as_str()))
    }

    /// Number of queued requests waiting for the next declarations.
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Names that have requests parked until they are declared.
    pub fn forward_names(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    /// Submits a documentation request.
    ///
    /// See [`Request`] for the accepted shapes. Rejected requests leave the scope unchanged.
    pub fn annotate(&mut self, request: Request) -> Result<(), AnnotateError> {
        match request.classify()? {
            Classified::Subject(subject, pending) => {
                let name = subject.display_name().to_string();
                self.register(subject, name, pending);
            }
            Classified::Name(name, pending) => {
                let manual = self
                    .manual
                    .get_or_insert_with(|| Manual::new(self.name.as_str()));
                let resolved = manual.resolve_subject(&self.resolver, &name);
                match resolved {
                    Some(subject) => self.register(subject, name, pending),
                    None => {
                        log::debug!("{}: `{name}` is not declared yet, parking request", self.name);
                        self.forward.entry(name.clone()).or_default().push(Pending {
                            target_name: Some(name),
                            ..pending
                        });
                    }
                }
            }
            Classified::Next(pending) => {
                log::debug!(
                    "{}: queueing request for the next declaration ({} waiting)",
                    self.name,
                    self.queued.len()
                );
                self.queued.push_back(pending);
            }
        }
        Ok(())
    }

    /// Reports that member `name` was just declared in this scope.
    ///
    /// Binds the oldest queued request to `handle`, or, if nothing is queued,
    /// every request parked under `name`. Must be called once per member, in
    /// declaration order.
    pub fn on_member_declared(&mut self, name: &str, handle: MemberHandle) {
        let subject = Subject::Member(handle);

        if let Some(mut pending) = self.queued.pop_front() {
            log::debug!("{}: binding queued request to {subject}", self.name);
            let target = pending.target_name.take().unwrap_or_else(|| name.to_string());
            self.register(subject, target, pending);
        } else {
            self.bind_parked(name, subject);
        }
    }

    /// Registers every request parked under `name` for `subject`.
    fn bind_parked(&mut self, name: &str, subject: Subject) {
        let Some(parked) = self.forward.remove(name) else {
            return;
        };
        log::debug!(
            "{}: binding {} parked request(s) to {subject}",
            self.name,
            parked.len()
        );
        for mut pending in parked {
            let target = pending.target_name.take().unwrap_or_else(|| name.to_string());
            self.register(subject.clone(), target, pending);
        }
    }

    fn register(&mut self, subject: Subject, name: String, pending: Pending) {
        let options = Options {
            name: Some(name),
            kind: None,
            description: pending.description,
        };
        self.manual().annotate(subject, options, pending.body);
    }

    /// The annotations of the member or constant called `name`.
    ///
    /// Undocumented or undeclared names yield an empty slice.
    pub fn lookup(&self, name: &str) -> &[Annotation] {
        match &self.manual {
            Some(manual) => manual.lookup(&self.resolver, name),
            None => &[],
        }
    }

    /// Renders the annotations of `name` with the default [`RenderSettings`].
    pub fn render(&self, name: &str) -> String {
        self.render_with(name, &RenderSettings::default())
    }

    /// Renders the annotations of `name`.
    pub fn render_with(&self, name: &str, settings: &RenderSettings) -> String {
        log::trace!("{}: rendering `{name}`", self.name);
        render_with(self.lookup(name), settings)
    }

    /// Renders the annotations of `name` to `output`.
    pub fn render_to<W: Write>(
        &self,
        name: &str,
        output: &mut W,
        settings: &RenderSettings,
    ) -> io::Result<()> {
        render_to(self.lookup(name), output, settings)
    }

    /// Erases all annotations of this scope. Pending requests are kept.
    pub fn clear(&mut self) {
        if let Some(manual) = &mut self.manual {
            manual.clear();
        }
    }
}

impl Declarer for DocScope<MemberTable> {
    fn declare_member(&mut self, name: &str, kind: MemberKind) {
        self.resolver.insert_member(name, kind);
        let handle = MemberHandle::new(self.name.as_str(), name, kind);
        self.on_member_declared(name, handle);
    }

    /// Constants never consume queued requests; only requests parked under
    /// `name` are bound.
    fn declare_constant(&mut self, name: &str) {
        let subject = Subject::Constant(name.to_string());
        self.resolver.insert_constant(name, subject.clone());
        self.bind_parked(name, subject);
    }
}

/// A [`DocScope`] that can be shared between threads.
///
/// Every operation locks the scope for its whole duration, so declarations and
/// annotations from different threads are applied one at a time.
#[derive(Debug)]
pub struct SharedScope<R = MemberTable>(Arc<Mutex<DocScope<R>>>);

impl<R> Clone for SharedScope<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R: Resolve> SharedScope<R> {
    /// Wraps `scope`.
    pub fn new(scope: DocScope<R>) -> Self {
        Self(Arc::new(Mutex::new(scope)))
    }

    /// Locks the scope for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, DocScope<R>> {
        self.0.lock()
    }

    /// See [`DocScope::annotate`].
    pub fn annotate(&self, request: Request) -> Result<(), AnnotateError> {
        self.lock().annotate(request)
    }

    /// See [`DocScope::on_member_declared`].
    pub fn on_member_declared(&self, name: &str, handle: MemberHandle) {
        self.lock().on_member_declared(name, handle)
    }

    /// Clones the annotations of `name` out of the scope.
    pub fn lookup(&self, name: &str) -> Vec<Annotation> {
        self.lock().lookup(name).to_vec()
    }

    /// See [`DocScope::render`].
    pub fn render(&self, name: &str) -> String {
        self.lock().render(name)
    }
}

impl SharedScope<MemberTable> {
    /// See [`Declarer::declare_member`].
    pub fn declare_member(&self, name: &str, kind: MemberKind) {
        self.lock().declare_member(name, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ArgSpec, Kind};

    #[ctor::ctor]
    fn init() {
        env_logger::init();
    }

    fn descriptions(scope: &DocScope, name: &str) -> Vec<String> {
        scope
            .lookup(name)
            .iter()
            .filter_map(|a| a.description().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_annotate_declared_entity() {
        let mut scope = DocScope::new("Greeter");
        scope.define_constant("Greeting", Subject::Class("Greeting".into()));
        scope
            .annotate(Request::of(Subject::Class("Greeting".into()), "a greeting"))
            .unwrap();

        let records = scope.lookup("Greeting");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), Kind::Class);
        assert_eq!(records[0].name(), "Greeting");
    }

    #[test]
    fn test_annotate_after_declaration() {
        let mut scope = DocScope::new("Greeter");
        scope.declare_member("greet", MemberKind::Instance);
        scope.annotate(Request::of("greet", "greets")).unwrap();

        assert_eq!(descriptions(&scope, "greet"), ["greets"]);
        assert_eq!(scope.forward_names().count(), 0);
    }

    #[test]
    fn test_queued_requests_bind_in_order() {
        let mut scope = DocScope::new("Greeter");
        scope.annotate(Request::next("first")).unwrap();
        scope.annotate(Request::next_with(|_| "second")).unwrap();
        scope.annotate(Request::next("third")).unwrap();
        assert_eq!(scope.queued_len(), 3);

        scope.declare_member("a", MemberKind::Instance);
        scope.declare_member("b", MemberKind::Scope);
        scope.declare_member("c", MemberKind::Instance);

        assert_eq!(scope.queued_len(), 0);
        assert_eq!(descriptions(&scope, "a"), ["first"]);
        assert_eq!(descriptions(&scope, "b"), ["second"]);
        assert_eq!(descriptions(&scope, "c"), ["third"]);
        assert_eq!(scope.lookup("b")[0].kind(), Kind::ScopeMethod);
    }

    #[test]
    fn test_queued_request_takes_declared_name() {
        let mut scope = DocScope::new("Greeter");
        scope.annotate(Request::next("greets")).unwrap();
        scope.declare_member("greet", MemberKind::Instance);

        assert_eq!(scope.lookup("greet")[0].name(), "greet");
    }

    #[test]
    fn test_forward_reference() {
        let mut scope = DocScope::new("Greeter");
        scope
            .annotate(Request::of_with("future_method", |a| {
                a.arg("x", ArgSpec::typed("Integer"));
                "will exist"
            }))
            .unwrap();
        assert!(scope.lookup("future_method").is_empty());
        assert_eq!(scope.forward_names().collect::<Vec<_>>(), ["future_method"]);

        scope.declare_member("other", MemberKind::Instance);
        assert!(scope.lookup("other").is_empty());

        scope.declare_member("future_method", MemberKind::Instance);
        let records = scope.lookup("future_method");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description(), Some("will exist"));
        assert!(records[0].get_arg("x").is_some());
        assert_eq!(scope.forward_names().count(), 0);
    }

    #[test]
    fn test_several_forward_references_to_one_name() {
        let mut scope = DocScope::new("Greeter");
        scope.annotate(Request::of("later", "one")).unwrap();
        scope.annotate(Request::of("later", "two")).unwrap();
        scope.declare_member("later", MemberKind::Scope);

        assert_eq!(descriptions(&scope, "later"), ["one", "two"]);
    }

    #[test]
    fn test_queue_has_priority_over_forward_references() {
        let mut scope = DocScope::new("Greeter");
        scope.annotate(Request::of("greet", "parked")).unwrap();
        scope.annotate(Request::next("queued")).unwrap();

        scope.declare_member("greet", MemberKind::Instance);
        assert_eq!(descriptions(&scope, "greet"), ["queued"]);
        assert_eq!(scope.forward_names().collect::<Vec<_>>(), ["greet"]);
    }

    #[test]
    fn test_declaration_without_pending_requests() {
        let mut scope = DocScope::new("Greeter");
        scope.declare_member("greet", MemberKind::Instance);
        assert!(scope.lookup("greet").is_empty());
    }

    #[test]
    fn test_rejected_request_changes_nothing() {
        let mut scope = DocScope::new("Greeter");
        assert!(scope.annotate(Request::new()).is_err());
        assert!(scope
            .annotate(Request::of("bad name", "text"))
            .is_err());
        assert_eq!(scope.queued_len(), 0);
        assert_eq!(scope.forward_names().count(), 0);
    }

    #[test]
    fn test_clear_keeps_pending_requests() {
        let mut scope = DocScope::new("Greeter");
        scope.declare_member("greet", MemberKind::Instance);
        scope.annotate(Request::of("greet", "greets")).unwrap();
        scope.annotate(Request::next("queued")).unwrap();

        scope.clear();
        assert!(scope.lookup("greet").is_empty());
        assert_eq!(scope.queued_len(), 1);
    }

    #[test]
    fn test_lookup_before_manual_exists() {
        let scope = DocScope::new("Greeter");
        assert!(scope.lookup("anything").is_empty());
        assert_eq!(scope.render("anything"), "");
    }

    #[test]
    fn test_custom_resolver() {
        struct Fixed;

        impl Resolve for Fixed {
            fn resolve_by_name(&self, name: &str) -> Option<Subject> {
                (name == "Config").then(|| Subject::Module("Config".into()))
            }

            fn has_instance_member(&self, name: &str) -> bool {
                name == "run"
            }

            fn has_scope_member(&self, _: &str) -> bool {
                false
            }
        }

        let mut scope = DocScope::with_resolver("App", Fixed);
        scope.annotate(Request::of("run", "runs the app")).unwrap();
        scope.annotate(Request::of("Config", "settings")).unwrap();

        assert_eq!(scope.lookup("run")[0].kind(), Kind::InstanceMethod);
        assert_eq!(scope.lookup("Config")[0].kind(), Kind::Module);
    }

    #[test]
    fn test_shared_scope_across_threads() {
        let shared = SharedScope::new(DocScope::new("Greeter"));

        std::thread::scope(|s| {
            for i in 0..4 {
                let shared = shared.clone();
                s.spawn(move || {
                    let name = format!("member_{i}");
                    shared
                        .annotate(Request::of(name.as_str(), format!("number {i}")))
                        .unwrap();
                });
            }
        });

        assert_eq!(shared.lock().forward_names().count(), 4);
        for i in 0..4 {
            shared.declare_member(&format!("member_{i}"), MemberKind::Instance);
        }
        for i in 0..4 {
            let records = shared.lookup(&format!("member_{i}"));
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].description(), Some(format!("number {i}").as_str()));
        }
    }
}

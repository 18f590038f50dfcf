//! Annotation records: the documentation attached to a single subject.
//!
//! An [`Annotation`] is created once, when a request is bound to a resolved
//! [`Subject`](crate::Subject), and mutated through its builder methods only while
//! its [`Body`] runs. After registration it is never changed again.

use std::any::type_name;
use std::fmt::{self, Debug, Display, Formatter};

use indexmap::IndexMap;

/// What kind of subject an annotation documents.
///
/// Inferred from the subject at registration time unless given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// A class-like type.
    Class,
    /// A module-like namespace.
    Module,
    /// A callable invoked on an instance of the declaring scope.
    InstanceMethod,
    /// A callable invoked on the declaring scope itself (rendered with a `self.` prefix).
    ScopeMethod,
    /// Nothing could be inferred, e.g. for plain constant values.
    #[default]
    Unspecified,
}

impl Kind {
    /// Whether records of this kind are callables, and thus produce rendered output.
    pub fn is_callable(self) -> bool {
        matches!(self, Kind::InstanceMethod | Kind::ScopeMethod)
    }
}

/// The display name of a documented type.
///
/// Types are never checked against the actual runtime types; a `TypeRef` only
/// exists to be printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    /// A type reference with an arbitrary display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A type reference naming the Rust type `T`, with module paths stripped.
    ///
    /// ```rust
    /// # use docnotes::TypeRef;
    /// assert_eq!(TypeRef::of::<String>().as_str(), "String");
    /// assert_eq!(TypeRef::of::<Vec<String>>().as_str(), "Vec<String>");
    /// assert_eq!(TypeRef::of::<Option<u32>>().as_str(), "Option<u32>");
    /// ```
    pub fn of<T: ?Sized>() -> Self {
        Self(strip_paths(type_name::<T>()))
    }

    /// The display name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self::named(value)
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Removes `a::b::` prefixes from every path inside a type name, keeping generics intact.
fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(last_segment(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&segment));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Metadata of one documented argument.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgMeta {
    /// The declared type, if any.
    pub ty: Option<TypeRef>,
    /// The default value, already rendered to text.
    pub default: Option<String>,
    /// What the argument means.
    pub description: Option<String>,
}

impl ArgMeta {
    /// Sets the type.
    pub fn with_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Sets the default value, rendered through its [`Display`] implementation.
    pub fn with_default(mut self, default: impl Display) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The ways argument metadata can be specified through [`Annotation::arg`].
///
/// Plain strings convert into [`ArgSpec::Description`] and an [`ArgMeta`] into
/// [`ArgSpec::Meta`]. Typed forms are built with the constructor functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// Description only.
    Description(String),
    /// A type, optionally described.
    Typed(TypeRef, Option<String>),
    /// Type, default value and an optional description, in that order.
    Full(TypeRef, String, Option<String>),
    /// Already-built metadata.
    Meta(ArgMeta),
}

impl ArgSpec {
    /// A typed argument without description.
    pub fn typed(ty: impl Into<TypeRef>) -> Self {
        ArgSpec::Typed(ty.into(), None)
    }

    /// A typed and described argument.
    pub fn typed_desc(ty: impl Into<TypeRef>, description: impl Into<String>) -> Self {
        ArgSpec::Typed(ty.into(), Some(description.into()))
    }

    /// A typed, defaulted and described argument.
    pub fn full(
        ty: impl Into<TypeRef>,
        default: impl Display,
        description: impl Into<String>,
    ) -> Self {
        ArgSpec::Full(ty.into(), default.to_string(), Some(description.into()))
    }

    fn into_meta(self) -> ArgMeta {
        match self {
            ArgSpec::Description(description) => ArgMeta {
                description: Some(description),
                ..ArgMeta::default()
            },
            ArgSpec::Typed(ty, description) => ArgMeta {
                ty: Some(ty),
                default: None,
                description,
            },
            ArgSpec::Full(ty, default, description) => ArgMeta {
                ty: Some(ty),
                default: Some(default),
                description,
            },
            ArgSpec::Meta(meta) => meta,
        }
    }
}

impl From<&str> for ArgSpec {
    fn from(value: &str) -> Self {
        ArgSpec::Description(value.to_string())
    }
}

impl From<String> for ArgSpec {
    fn from(value: String) -> Self {
        ArgSpec::Description(value)
    }
}

impl From<ArgMeta> for ArgSpec {
    fn from(value: ArgMeta) -> Self {
        ArgSpec::Meta(value)
    }
}

/// What a documented callable returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Returns {
    /// The return type, if documented.
    pub ty: Option<TypeRef>,
    /// What the returned value means.
    pub description: Option<String>,
}

/// The ways a return value can be specified through [`Annotation::returns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnSpec {
    /// Description only, the type stays absent.
    Description(String),
    /// A type, optionally described.
    Typed(TypeRef, Option<String>),
}

impl ReturnSpec {
    /// A typed and described return value. The description is rendered through [`Display`].
    pub fn typed_desc(ty: impl Into<TypeRef>, description: impl Display) -> Self {
        ReturnSpec::Typed(ty.into(), Some(description.to_string()))
    }
}

impl From<&str> for ReturnSpec {
    fn from(value: &str) -> Self {
        ReturnSpec::Description(value.to_string())
    }
}

impl From<String> for ReturnSpec {
    fn from(value: String) -> Self {
        ReturnSpec::Description(value)
    }
}

impl From<TypeRef> for ReturnSpec {
    fn from(value: TypeRef) -> Self {
        ReturnSpec::Typed(value, None)
    }
}

/// Values a [`Body`] may end with.
///
/// When the body did not call [`Annotation::desc`], the trailing value (if it
/// carries text) becomes the description.
pub trait TrailingDescription {
    /// The text carried by this value, if any.
    fn into_description(self) -> Option<String>;
}

impl TrailingDescription for () {
    fn into_description(self) -> Option<String> {
        None
    }
}

impl TrailingDescription for &str {
    fn into_description(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl TrailingDescription for String {
    fn into_description(self) -> Option<String> {
        Some(self)
    }
}

impl<T: TrailingDescription> TrailingDescription for Option<T> {
    fn into_description(self) -> Option<String> {
        self.and_then(T::into_description)
    }
}

/// A builder callback run against a freshly created [`Annotation`].
///
/// ```rust
/// # use docnotes::{ArgSpec, Body, TypeRef};
/// let body = Body::new(|a| {
///     a.arg("name", ArgSpec::typed_desc("String", "who to greet"));
///     a.returns(TypeRef::named("String"));
///     "Greets someone by name."
/// });
/// # let _ = body;
/// ```
pub struct Body(Box<dyn FnOnce(&mut Annotation) -> Option<String> + Send>);

impl Body {
    /// Wraps a callback; see [`TrailingDescription`] for what it may return.
    pub fn new<F, R>(f: F) -> Self
    where
        F: FnOnce(&mut Annotation) -> R + Send + 'static,
        R: TrailingDescription,
    {
        Self(Box::new(move |annotation| f(annotation).into_description()))
    }

    fn run(self, annotation: &mut Annotation) -> Option<String> {
        (self.0)(annotation)
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Body(..)")
    }
}

/// Values known about an annotation before its body runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Display name of the subject.
    pub name: Option<String>,
    /// Kind of the subject.
    pub kind: Option<Kind>,
    /// Description given alongside the request.
    pub description: Option<String>,
}

/// One documentation entry for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    name: String,
    kind: Kind,
    description: Option<String>,
    args: IndexMap<String, ArgMeta>,
    returns: Returns,
}

impl Annotation {
    /// Creates a record and runs `body` against it.
    pub fn new(name: impl Into<String>, options: Options, body: Option<Body>) -> Self {
        let mut annotation = Self {
            name: name.into(),
            kind: options.kind.unwrap_or_default(),
            description: options.description,
            args: IndexMap::new(),
            returns: Returns::default(),
        };

        if let Some(body) = body {
            let trailing = body.run(&mut annotation);
            if annotation.description.is_none() {
                annotation.description = trailing;
            }
        }

        annotation
    }

    /// Display name of the documented subject.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the documented subject.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Overrides the kind.
    pub fn set_kind(&mut self, kind: Kind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Documents an argument. Documenting the same name twice replaces the
    /// metadata but keeps the original position.
    pub fn arg(&mut self, name: impl Into<String>, spec: impl Into<ArgSpec>) -> &mut Self {
        self.args.insert(name.into(), spec.into().into_meta());
        self
    }

    /// The metadata of argument `name`, if documented.
    pub fn get_arg(&self, name: &str) -> Option<&ArgMeta> {
        self.args.get(name)
    }

    /// Documents several arguments, in iteration order.
    pub fn args<K, S>(&mut self, args: impl IntoIterator<Item = (K, S)>) -> &mut Self
    where
        K: Into<String>,
        S: Into<ArgSpec>,
    {
        for (name, spec) in args {
            self.arg(name, spec);
        }
        self
    }

    /// All documented arguments in declaration order.
    pub fn arguments(&self) -> &IndexMap<String, ArgMeta> {
        &self.args
    }

    /// Sets the description.
    pub fn desc(&mut self, text: impl Display) -> &mut Self {
        self.description = Some(text.to_string());
        self
    }

    /// The description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Documents the return value.
    pub fn returns(&mut self, spec: impl Into<ReturnSpec>) -> &mut Self {
        self.returns = match spec.into() {
            ReturnSpec::Description(description) => Returns {
                ty: None,
                description: Some(description),
            },
            ReturnSpec::Typed(ty, description) => Returns {
                ty: Some(ty),
                description,
            },
        };
        self
    }

    /// The documented return value.
    pub fn return_value(&self) -> &Returns {
        &self.returns
    }
}

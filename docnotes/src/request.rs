//! Annotation requests and how they are classified.

use std::fmt::Display;

use thiserror::Error;

use crate::annotation::{Body, TrailingDescription};
use crate::subject::{is_name_like, Subject};
use crate::Annotation;

/// What a request documents, if given explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An entity that is already declared.
    Subject(Subject),
    /// A member or constant referred to by name, possibly not declared yet.
    Name(String),
}

impl From<Subject> for Target {
    fn from(value: Subject) -> Self {
        Target::Subject(value)
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Name(value.to_string())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Target::Name(value)
    }
}

/// Returned by [`DocScope::annotate`](crate::DocScope::annotate).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotateError {
    /// The request combines target, description and body in an unsupported way.
    #[error("invalid annotation form: {0}")]
    InvalidAnnotationForm(&'static str),
    /// The target is a name that cannot name a member or constant.
    #[error("invalid document subject `{0}`: must be a declared entity or an identifier")]
    InvalidSubjectType(String),
}

/// A request to document something.
///
/// Exactly four shapes are accepted:
///
/// | target | description | body | meaning                                   |
/// |--------|-------------|------|-------------------------------------------|
/// | yes    | yes         | no   | document the target                       |
/// | no     | yes         | no   | document whatever is declared next        |
/// | no     | no          | yes  | document whatever is declared next        |
/// | yes    | no          | yes  | document the target                       |
///
/// Anything else is rejected with [`AnnotateError::InvalidAnnotationForm`].
#[derive(Debug, Default)]
pub struct Request {
    pub(crate) target: Option<Target>,
    pub(crate) description: Option<String>,
    pub(crate) body: Option<Body>,
}

impl Request {
    /// An empty request. On its own this is not a valid form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents the next declared member with `description`.
    pub fn next(description: impl Display) -> Self {
        Self::new().description(description)
    }

    /// Documents the next declared member through `body`.
    pub fn next_with<F, R>(body: F) -> Self
    where
        F: FnOnce(&mut Annotation) -> R + Send + 'static,
        R: TrailingDescription,
    {
        Self::new().body(body)
    }

    /// Documents `target` with `description`.
    pub fn of(target: impl Into<Target>, description: impl Display) -> Self {
        Self::new().target(target).description(description)
    }

    /// Documents `target` through `body`.
    pub fn of_with<F, R>(target: impl Into<Target>, body: F) -> Self
    where
        F: FnOnce(&mut Annotation) -> R + Send + 'static,
        R: TrailingDescription,
    {
        Self::new().target(target).body(body)
    }

    /// Sets the target.
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Display) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the body.
    pub fn body<F, R>(mut self, body: F) -> Self
    where
        F: FnOnce(&mut Annotation) -> R + Send + 'static,
        R: TrailingDescription,
    {
        self.body = Some(Body::new(body));
        self
    }

    /// Checks the shape of this request.
    pub(crate) fn classify(self) -> Result<Classified, AnnotateError> {
        let Request {
            target,
            description,
            body,
        } = self;

        match (target, description.is_some(), body.is_some()) {
            (Some(target), true, false) | (Some(target), false, true) => {
                let pending = Pending {
                    target_name: None,
                    description,
                    body,
                };
                match target {
                    Target::Subject(subject) => Ok(Classified::Subject(subject, pending)),
                    Target::Name(name) if is_name_like(&name) => {
                        Ok(Classified::Name(name, pending))
                    }
                    Target::Name(name) => Err(AnnotateError::InvalidSubjectType(name)),
                }
            }
            (None, true, false) | (None, false, true) => Ok(Classified::Next(Pending {
                target_name: None,
                description,
                body,
            })),
            (None, false, false) => Err(AnnotateError::InvalidAnnotationForm(
                "nothing to annotate with",
            )),
            (Some(_), false, false) => Err(AnnotateError::InvalidAnnotationForm(
                "a subject needs a description or a body",
            )),
            (_, true, true) => Err(AnnotateError::InvalidAnnotationForm(
                "a description and a body cannot be combined",
            )),
        }
    }
}

/// A request whose shape was accepted.
#[derive(Debug)]
pub(crate) enum Classified {
    Subject(Subject, Pending),
    Name(String, Pending),
    Next(Pending),
}

/// A request waiting for its subject to be declared.
#[derive(Debug)]
pub(crate) struct Pending {
    pub(crate) target_name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) body: Option<Body>,
}

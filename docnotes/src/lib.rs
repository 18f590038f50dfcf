#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
//! ## This Documentation
//!
//! * [Annotation records](annotation)
//! * [Name resolution](resolve)
//! * [The deferred-registration protocol](scope)
//! * [Rendering](render)
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![cfg_attr(not(docsrs), allow(rustdoc::broken_intra_doc_links))]

pub mod annotation;
pub use annotation::{
    Annotation, ArgMeta, ArgSpec, Body, Kind, Options, ReturnSpec, Returns, TrailingDescription,
    TypeRef,
};

mod declare;
pub use declare::{Declarer, Members};

mod manual;
pub use manual::Manual;

pub mod render;
pub use render::{render, render_to, render_with, RenderSettings};

mod request;
pub use request::{AnnotateError, Request, Target};

pub mod resolve;
pub use resolve::{MemberTable, Resolve};

pub mod scope;
pub use scope::{DocScope, SharedScope};

mod subject;
pub use subject::{MemberHandle, MemberKind, Subject};

/// Generate a [`Members`] implementation for the type of an inherent `impl` block.
///
/// Every associated function is reported to the [`Declarer`] in source order:
/// functions with a `self` receiver as [`MemberKind::Instance`], the others as
/// [`MemberKind::Scope`]. Associated constants are reported through
/// [`Declarer::declare_constant`]. The scope is named after the type, unless a
/// name is given as a string literal: `#[members("Greeter")]`.
///
/// ```rust
/// use docnotes::{members, DocScope, Members, Request};
///
/// struct Greeter;
///
/// #[members]
/// impl Greeter {
///     const GREETING: &'static str = "hello";
///
///     fn new() -> Self {
///         Greeter
///     }
///
///     fn greet(&self, name: &str) -> String {
///         format!("{} {name}", Self::GREETING)
///     }
/// }
///
/// let mut scope = DocScope::of::<Greeter>();
/// scope.annotate(Request::next("Makes a greeter.")).unwrap();
/// scope.annotate(Request::next("Greets someone.")).unwrap();
/// Greeter::declare_members(&mut scope);
///
/// assert_eq!(scope.render("new"), "self.new()\n\n  Makes a greeter.\n");
/// assert_eq!(scope.render("greet"), "greet()\n\n  Greets someone.\n");
/// ```
#[cfg(feature = "macros")]
pub use docnotes_macros::members;

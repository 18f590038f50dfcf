//! Render annotations as fixed-width plain text.
//!
//! Only callables produce output. Each one renders as a signature line, one
//! aligned line per argument and, if present, the wrapped description:
//!
//! ```text
//! greet(name, age=30) => String
//!   name (String)  a name
//!   age  (Integer) the age
//!
//!   Greets someone.
//! ```

use std::io::{self, Write};

use itertools::Itertools;

use crate::annotation::{Annotation, Kind};

mod wrap;
use wrap::wrap;

/// Settings related to rendering annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Width that argument lines are wrapped to.
    pub line_width: usize,
    /// Width that the description of a callable is wrapped to.
    pub description_width: usize,
    /// Argument descriptions are never wrapped narrower than this.
    pub min_arg_description_width: usize,
    /// Spaces in front of argument and description lines.
    pub indent: usize,
}

impl RenderSettings {
    /// Sets the width argument lines are wrapped to.
    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Sets the width descriptions are wrapped to.
    pub fn with_description_width(mut self, width: usize) -> Self {
        self.description_width = width;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            line_width: 78,
            description_width: 76,
            min_arg_description_width: 12,
            indent: 2,
        }
    }
}

/// Renders `records` with the default [`RenderSettings`].
pub fn render(records: &[Annotation]) -> String {
    render_with(records, &RenderSettings::default())
}

/// Renders `records` to a string.
pub fn render_with(records: &[Annotation], settings: &RenderSettings) -> String {
    let mut out = String::new();
    for record in records.iter().filter(|r| r.kind().is_callable()) {
        render_callable(record, &mut out, settings);
    }
    out
}

/// Renders `records` to `output`.
pub fn render_to<W: Write>(
    records: &[Annotation],
    output: &mut W,
    settings: &RenderSettings,
) -> io::Result<()> {
    output.write_all(render_with(records, settings).as_bytes())
}

fn render_callable(record: &Annotation, out: &mut String, settings: &RenderSettings) {
    let args = record.arguments();

    // signature
    if record.kind() == Kind::ScopeMethod {
        out.push_str("self.");
    }
    let params = args
        .iter()
        .map(|(name, meta)| match &meta.default {
            Some(default) => format!("{name}={default}"),
            None => name.clone(),
        })
        .join(", ");
    out.push_str(&format!("{}({params})", record.name()));
    if let Some(ty) = &record.return_value().ty {
        out.push_str(&format!(" => {ty}"));
    }
    out.push('\n');

    // arguments
    let arg_width = args.keys().map(|n| n.chars().count()).max().unwrap_or(0);
    let type_width = args
        .values()
        .filter_map(|meta| meta.ty.as_ref())
        .map(|ty| ty.as_str().chars().count())
        .max();
    // " (Type)", padded; absent when no argument has a type
    let type_column = type_width.map_or(0, |w| w + 3);
    let type_width = type_width.unwrap_or(0);

    let indent = " ".repeat(settings.indent);
    let description_width = settings
        .line_width
        .saturating_sub(settings.indent + arg_width + type_width + 3)
        .max(settings.min_arg_description_width);

    for (name, meta) in args {
        // only typed arguments take up the type column
        let (ty, ty_width) = match &meta.ty {
            Some(ty) => (format!(" ({ty})"), type_column),
            None => (String::new(), 0),
        };
        let line = format!("{indent}{name:<arg_width$}{ty:<ty_width$}");
        let hanging = " ".repeat(settings.indent + arg_width + ty_width + 1);

        let description = meta
            .description
            .as_deref()
            .map(|d| wrap(d, description_width))
            .unwrap_or_default();
        match description.split_first() {
            Some((first, rest)) => {
                out.push_str(&format!("{line} {first}\n"));
                for l in rest {
                    out.push_str(&format!("{hanging}{l}\n"));
                }
            }
            None => {
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
    }

    // description
    if let Some(description) = record.description() {
        out.push('\n');
        for l in wrap(description, settings.description_width) {
            out.push_str(&format!("{indent}{l}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ArgSpec, Body, Options, ReturnSpec, TypeRef};
    use pretty_assertions::assert_eq;

    fn record(name: &str, kind: Kind, body: impl FnOnce(&mut Annotation) + Send + 'static) -> Annotation {
        Annotation::new(
            name,
            Options {
                kind: Some(kind),
                ..Options::default()
            },
            Some(Body::new(body)),
        )
    }

    #[test]
    fn test_typed_args_and_return() {
        let greet = record("greet", Kind::InstanceMethod, |a| {
            a.arg("name", ArgSpec::typed_desc("String", "a name"))
                .arg("age", ArgSpec::full("Integer", 30, "the age"))
                .returns(TypeRef::named("String"));
        });

        assert_eq!(
            render(&[greet]),
            "greet(name, age=30) => String\n\
             \x20 name (String)  a name\n\
             \x20 age  (Integer) the age\n"
        );
    }

    #[test]
    fn test_scope_method_prefix() {
        let create = record("create", Kind::ScopeMethod, |a| {
            a.desc("Makes a greeter.");
        });

        assert_eq!(render(&[create]), "self.create()\n\n  Makes a greeter.\n");
    }

    #[test]
    fn test_untyped_args() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("x", "the x").arg("longer", "the longer one");
        });

        assert_eq!(
            render(&[f]),
            "f(x, longer)\n\
             \x20 x      the x\n\
             \x20 longer the longer one\n"
        );
    }

    #[test]
    fn test_untyped_args_skip_the_type_column() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("x", ArgSpec::typed_desc("Integer", "typed"))
                .arg("y", "untyped")
                .arg("z", ArgSpec::typed("u8"));
        });

        assert_eq!(
            render(&[f]),
            "f(x, y, z)\n\
             \x20 x (Integer) typed\n\
             \x20 y untyped\n\
             \x20 z (u8)\n"
        );
    }

    #[test]
    fn test_wrapped_untyped_arg_next_to_typed_arg() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("x", ArgSpec::typed_desc("T", "short"))
                .arg("y", "one two three four five");
        });

        // 20 - (2 + 1 + 1 + 3) = 13 columns; `y` continues under its own first line
        let settings = RenderSettings::default().with_line_width(20);
        assert_eq!(
            render_with(&[f], &settings),
            "f(x, y)\n\
             \x20 x (T) short\n\
             \x20 y one two three\n\
             \x20   four five\n"
        );
    }

    #[test]
    fn test_argument_order_is_declaration_order() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("b", "second letter").arg("a", "first letter");
        });

        let text = render(&[f]);
        assert!(text.starts_with("f(b, a)\n"));
    }

    #[test]
    fn test_wrapped_argument_description() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("x", ArgSpec::typed_desc("T", "one two three four five"));
        });

        // 20 - (2 + 1 + 1 + 3) = 13 columns for the description
        let settings = RenderSettings::default().with_line_width(20);
        assert_eq!(
            render_with(&[f], &settings),
            "f(x)\n\
             \x20 x (T) one two three\n\
             \x20       four five\n"
        );
    }

    #[test]
    fn test_argument_descriptions_have_a_minimum_width() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.arg("x", "aaaa bbbb cccc dddd");
        });

        let settings = RenderSettings::default().with_line_width(0);
        assert_eq!(
            render_with(&[f], &settings),
            "f(x)\n\
             \x20 x aaaa bbbb\n\
             \x20   cccc dddd\n"
        );
    }

    #[test]
    fn test_wrapped_description() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.desc("lorem ipsum dolor sit amet");
        });

        let settings = RenderSettings::default().with_description_width(12);
        assert_eq!(
            render_with(&[f], &settings),
            "f()\n\n  lorem ipsum\n  dolor sit\n  amet\n"
        );
    }

    #[test]
    fn test_return_description_is_not_rendered_in_signature() {
        let f = record("f", Kind::InstanceMethod, |a| {
            a.returns(ReturnSpec::Description("something".into()));
        });

        assert_eq!(render(&[f]), "f()\n");
    }

    #[test]
    fn test_non_callables_are_skipped() {
        let class = record("Greeter", Kind::Class, |a| {
            a.desc("A class.");
        });
        let constant = record("MAX", Kind::Unspecified, |a| {
            a.desc("A constant.");
        });
        let method = record("greet", Kind::InstanceMethod, |_| {});

        assert_eq!(render(&[class.clone(), constant]), "");
        assert_eq!(render(&[class, method]), "greet()\n");
    }

    #[test]
    fn test_records_render_in_order() {
        let first = record("greet", Kind::InstanceMethod, |a| {
            a.desc("first");
        });
        let second = record("greet", Kind::InstanceMethod, |a| {
            a.desc("second");
        });

        assert_eq!(
            render(&[first, second]),
            "greet()\n\n  first\ngreet()\n\n  second\n"
        );
    }

    #[test]
    fn test_render_to_writer() {
        let f = record("f", Kind::InstanceMethod, |_| {});
        let mut out = Vec::new();
        render_to(&[f], &mut out, &RenderSettings::default()).unwrap();
        assert_eq!(out, b"f()\n");
    }
}

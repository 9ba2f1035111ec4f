use crate::Error;
use crate::helpers;

/// The value type a parameter segment demands of its path token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    Str,
    Int,
}

/// One compiled `/`-separated component of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Matched by exact string equality.
    Literal(String),
    /// Matched by the kind's type predicate, contributing a typed value to
    /// the parameter map.
    Param { name: String, kind: ParamKind },
}

/// Compiles a route template into its segment sequence.
///
/// A segment written as `{name}` or `{name:kind}` compiles to a parameter
/// (kind token `int` demands an integer token, anything else or absent
/// means string); any other segment is a literal held verbatim. Templates
/// tokenize exactly like request paths, so a leading `/` is optional.
pub(crate) fn compile_template(template: &str) -> crate::Result<Vec<Segment>> {
    helpers::path_tokens(template).map(compile_segment).collect()
}

fn compile_segment(raw: &str) -> crate::Result<Segment> {
    let opens = raw.starts_with('{');
    let closes = raw.ends_with('}');

    match (opens, closes) {
        (true, true) => {
            let inner = &raw[1..raw.len() - 1];
            let (name, kind) = match inner.split_once(':') {
                Some((name, "int")) => (name, ParamKind::Int),
                Some((name, _)) => (name, ParamKind::Str),
                None => (inner, ParamKind::Str),
            };

            if name.is_empty() {
                return Err(Error::new(format!(
                    "Route parameter segment {:?} has no name",
                    raw
                )));
            }

            Ok(Segment::Param {
                name: name.to_owned(),
                kind,
            })
        }
        (true, false) | (false, true) => Err(Error::new(format!(
            "Unbalanced braces in route segment {:?}",
            raw
        ))),
        (false, false) => Ok(Segment::Literal(raw.to_owned())),
    }
}

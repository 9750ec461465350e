//! Translation of bound segments into an anchored regular expression
//!
//! Each parameter owns exactly one capture group, numbered in declaration
//! order starting at 1. Group names are not used because parameter names may
//! contain `$` and `-`.

use regex::Regex;

use super::pattern::{Part, Quantifier, Segment};
use crate::error::{PatternError, PatternErrorKind};

/// Builds the expression source for `segments`
///
/// | Part | Expression |
/// |---|---|
/// | literal | escaped text, `/` before a segment's first part |
/// | `{a}` | `([^/]+?)` |
/// | `{a?}` alone in its segment | `(?:/([^/]+?))?` |
/// | `{a?}` next to other parts | `([^/]+?)?` |
/// | `{a+}` | `(.+)`, wrapped as `(?:/(.+))` when first |
/// | `{a*}` | as `+` with `(.*)`, then made lazily optional |
pub(crate) fn expression(segments: &[Segment]) -> String {
    let mut expr = String::new();

    for segment in segments {
        let sole = segment.parts.len() == 1;

        for (index, part) in segment.parts.iter().enumerate() {
            let lead = if index == 0 { "/" } else { "" };

            match part {
                Part::Literal { text } => {
                    expr.push_str(lead);
                    expr.push_str(&regex::escape(text));
                }
                Part::Parameter(p) => match p.quantifier {
                    Quantifier::Optional if sole => expr.push_str("(?:/([^/]+?))?"),
                    Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                        let group = if p.quantifier == Quantifier::ZeroOrMore {
                            "(.*)"
                        } else {
                            "(.+)"
                        };
                        if index == 0 {
                            expr.push_str("(?:/");
                            expr.push_str(group);
                            expr.push(')');
                        } else {
                            expr.push_str(group);
                        }
                        if p.quantifier == Quantifier::ZeroOrMore {
                            expr.push_str("??");
                        }
                    }
                    quantifier => {
                        expr.push_str(lead);
                        expr.push_str("([^/]+?)");
                        expr.push_str(quantifier.as_str());
                    }
                },
            }
        }
    }

    if expr.is_empty() {
        "^/$".to_string()
    } else {
        format!("^{}/?$", expr)
    }
}

/// Compiles `segments` into the matcher regex
pub(crate) fn compile(template: &str, segments: &[Segment]) -> Result<Regex, PatternError> {
    let source = expression(segments);
    Regex::new(&source)
        .map_err(|e| PatternError::new(PatternErrorKind::Compile(e.to_string()), template))
}

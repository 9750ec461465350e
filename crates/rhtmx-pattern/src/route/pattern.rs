//! Compiled pattern structure: segments, parts and parameters
//!
//! These are the bound forms. Every parameter here has passed validation and
//! carries its built constraints.

use std::fmt;

use crate::constraint::Constraint;

/// How many path pieces a parameter consumes
///
/// | Template | Quantifier |
/// |---|---|
/// | `{id}` | `Required` |
/// | `{id?}` | `Optional` |
/// | `{path*}` | `ZeroOrMore` |
/// | `{path+}` | `OneOrMore` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Required,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(Quantifier::Optional),
            '*' => Some(Quantifier::ZeroOrMore),
            '+' => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    /// The template suffix for this quantifier (`""` for `Required`)
    pub fn as_str(self) -> &'static str {
        match self {
            Quantifier::Required => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Quantifier::Required | Quantifier::OneOrMore)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Quantifier::Optional | Quantifier::ZeroOrMore)
    }

    pub fn is_catch_all(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named route parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    pub(crate) name: String,
    pub(crate) quantifier: Quantifier,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) default: Option<String>,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Constraints in declaration order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Declared default, after defaulting rules
    ///
    /// `{path*}` defaults to `""`; an explicit empty default on any other
    /// quantifier counts as no default.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.quantifier.is_required()
    }

    pub fn is_optional(&self) -> bool {
        self.quantifier.is_optional()
    }

    pub fn is_catch_all(&self) -> bool {
        self.quantifier.is_catch_all()
    }
}

#[derive(Debug, Clone)]
pub enum Part {
    Literal { text: String },
    Parameter(Parameter),
}

impl Part {
    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Part::Parameter(p) => Some(p),
            Part::Literal { .. } => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.as_parameter().map_or(false, Parameter::is_optional)
    }
}

/// The parts between two `/` of a template
#[derive(Debug, Clone)]
pub struct Segment {
    pub(crate) parts: Vec<Part>,
}

impl Segment {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Parameters of this segment, in order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parts.iter().filter_map(Part::as_parameter)
    }
}

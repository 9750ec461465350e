//! Errors raised while building a route pattern
//!
//! Every failure is reported at construction time. A pattern is either fully
//! built or not built at all; the matcher and resolver never fail, they return
//! `None` instead.

use thiserror::Error;

/// Reason a route template was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    /// Structural syntax error (unbalanced braces, stray tokens, empty constraint)
    #[error("Invalid pattern")]
    InvalidPattern,
    /// Parameter name missing or not matching `[A-Za-z_$][A-Za-z0-9_$-]*`
    #[error("Invalid parameter name")]
    InvalidParameterName,
    /// Constraint name not matching `=` or `[A-Za-z0-9_$]*`
    #[error("Invalid constraint name")]
    InvalidConstraintName,
    #[error("Literal segments cannot contain the '?' character")]
    QuestionMarkInLiteral,
    #[error("Using all segment parameters as optional is not permitted")]
    AllOptionalSegment,
    #[error("A catch-all parameter can only appear as the last segment")]
    MisplacedCatchAll,
    #[error("The route parameter name '{0}' appears more than one time")]
    DuplicateParameter(String),
    #[error("Unknown constraint '{0}'")]
    UnknownConstraint(String),
    #[error("Invalid argument '{argument}' for constraint '{name}' ({reason})")]
    InvalidConstraintArgument {
        name: String,
        argument: String,
        reason: String,
    },
    /// The generated expression was refused by the regex engine
    #[error("Unable to compile route expression ({0})")]
    Compile(String),
}

/// A rejected route template
///
/// Displays as `"<reason>: <template>"`, always naming the whole template.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{PatternErrorKind, RoutePattern};
///
/// let err = RoutePattern::new("/{a}/{a}").unwrap_err();
/// assert_eq!(err.kind(), &PatternErrorKind::DuplicateParameter("a".to_string()));
/// assert_eq!(
///     err.to_string(),
///     "The route parameter name 'a' appears more than one time: /{a}/{a}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {template}")]
pub struct PatternError {
    kind: PatternErrorKind,
    template: String,
    offset: Option<usize>,
}

impl PatternError {
    pub(crate) fn new(kind: PatternErrorKind, template: &str) -> Self {
        Self {
            kind,
            template: template.to_string(),
            offset: None,
        }
    }

    pub(crate) fn at(kind: PatternErrorKind, template: &str, offset: usize) -> Self {
        Self {
            kind,
            template: template.to_string(),
            offset: Some(offset),
        }
    }

    pub fn kind(&self) -> &PatternErrorKind {
        &self.kind
    }

    /// The template that failed to build
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Byte offset of the offending token, for syntax errors
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Whether this is a grammar error rather than a semantic one
    pub fn is_syntax(&self) -> bool {
        matches!(
            self.kind,
            PatternErrorKind::InvalidPattern
                | PatternErrorKind::InvalidParameterName
                | PatternErrorKind::InvalidConstraintName
        )
    }
}

//! Template parser and validation
//!
//! [`parse`] turns the token stream into unbound segment nodes and reports
//! grammar errors. [`bind`] runs the semantic checks, applies the defaulting
//! rules and builds every constraint through a provider.

use std::collections::HashSet;

use super::pattern::{Parameter, Part, Quantifier, Segment};
use super::tokenizer::{tokenize, SpannedToken, Token};
use crate::constraint::{ConstraintError, ConstraintProvider};
use crate::error::{PatternError, PatternErrorKind};

// ============================================================================
// Unbound nodes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SegmentNode {
    pub parts: Vec<PartNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PartNode {
    Literal(String),
    Parameter(ParameterNode),
}

impl PartNode {
    fn is_optional(&self) -> bool {
        matches!(self, PartNode::Parameter(p) if p.quantifier.is_optional())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterNode {
    pub name: String,
    pub quantifier: Quantifier,
    pub constraints: Vec<ConstraintNode>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConstraintNode {
    pub name: String,
    pub argument: String,
}

// ============================================================================
// Grammar
// ============================================================================

/// Parses a template into segment nodes
///
/// Empty segments are dropped, so `"////a///{b}/"` parses like `"/a/{b}"`.
pub(crate) fn parse(template: &str) -> Result<Vec<SegmentNode>, PatternError> {
    let tokens = tokenize(template)
        .map_err(|e| PatternError::at(PatternErrorKind::InvalidPattern, template, e.at))?;

    Parser {
        template,
        cursor: Cursor::new(&tokens),
    }
    .segments()
}

struct Parser<'a> {
    template: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    fn segments(&mut self) -> Result<Vec<SegmentNode>, PatternError> {
        let mut segments = Vec::new();
        let mut parts = Vec::new();

        while let Some(t) = self.cursor.bump() {
            match &t.token {
                Token::Slash => {
                    if !parts.is_empty() {
                        segments.push(SegmentNode {
                            parts: std::mem::take(&mut parts),
                        });
                    }
                }
                Token::Literal(text) => parts.push(PartNode::Literal(text.clone())),
                Token::LBrace => parts.push(PartNode::Parameter(self.parameter()?)),
                _ => return Err(self.error(PatternErrorKind::InvalidPattern, t)),
            }
        }

        if !parts.is_empty() {
            segments.push(SegmentNode { parts });
        }

        Ok(segments)
    }

    /// `name [quantifier] (":" constraint)* "}"`, after the opening brace
    fn parameter(&mut self) -> Result<ParameterNode, PatternError> {
        let t = self.peek()?;
        let name = match &t.token {
            Token::Word(word) if is_parameter_name(word) => word.clone(),
            _ => return Err(self.error(PatternErrorKind::InvalidParameterName, t)),
        };
        self.cursor.bump();

        let t = self.peek()?;
        let quantifier = match t.token {
            Token::Quantifier(c) => {
                self.cursor.bump();
                let next = self.peek()?;
                if !matches!(next.token, Token::Colon | Token::RBrace) {
                    return Err(self.error(PatternErrorKind::InvalidPattern, next));
                }
                Quantifier::from_char(c).unwrap_or(Quantifier::Required)
            }
            Token::Colon | Token::RBrace => Quantifier::Required,
            _ => return Err(self.error(PatternErrorKind::InvalidParameterName, t)),
        };

        let mut constraints = Vec::new();
        let mut default = None;

        loop {
            let t = self.peek()?;
            self.cursor.bump();
            match t.token {
                Token::RBrace => break,
                Token::Colon => {
                    let (name, argument) = self.constraint(t)?;
                    match name.as_str() {
                        "=" | "default" => {
                            // First declaration wins
                            if default.is_none() {
                                default = Some(argument.unwrap_or_default());
                            }
                        }
                        "" => constraints.push(ConstraintNode {
                            name: "regex".to_string(),
                            argument: argument.unwrap_or_default(),
                        }),
                        _ => constraints.push(ConstraintNode {
                            name,
                            argument: argument.unwrap_or_default(),
                        }),
                    }
                }
                _ => return Err(self.error(PatternErrorKind::InvalidPattern, t)),
            }
        }

        Ok(ParameterNode {
            name,
            quantifier,
            constraints,
            default,
        })
    }

    /// `constraintName ["(" argument ")"]`, after the colon
    fn constraint(
        &mut self,
        colon: &SpannedToken,
    ) -> Result<(String, Option<String>), PatternError> {
        let t = self.peek()?;
        let name = match &t.token {
            Token::Equals => "=".to_string(),
            Token::Word(word) if is_constraint_name(word) => word.clone(),
            Token::Argument(_) | Token::Colon | Token::RBrace => String::new(),
            _ => return Err(self.error(PatternErrorKind::InvalidConstraintName, t)),
        };
        if !name.is_empty() {
            self.cursor.bump();
        }

        let t = self.peek()?;
        let argument = match &t.token {
            Token::Argument(argument) => {
                self.cursor.bump();
                Some(argument.clone())
            }
            Token::Colon | Token::RBrace => None,
            _ => return Err(self.error(PatternErrorKind::InvalidConstraintName, t)),
        };

        if argument.is_some() {
            let next = self.peek()?;
            if !matches!(next.token, Token::Colon | Token::RBrace) {
                return Err(self.error(PatternErrorKind::InvalidPattern, next));
            }
        }

        if name.is_empty() && argument.as_deref().map_or(true, str::is_empty) {
            return Err(self.error(PatternErrorKind::InvalidPattern, colon));
        }

        Ok((name, argument))
    }

    /// Next token inside a parameter; running out of tokens there is a syntax error
    fn peek(&self) -> Result<&'a SpannedToken, PatternError> {
        self.cursor.peek().ok_or_else(|| {
            PatternError::at(
                PatternErrorKind::InvalidPattern,
                self.template,
                self.template.len(),
            )
        })
    }

    fn error(&self, kind: PatternErrorKind, at: &SpannedToken) -> PatternError {
        PatternError::at(kind, self.template, at.start)
    }
}

struct Cursor<'a> {
    toks: &'a [SpannedToken],
    i: usize,
}

impl<'a> Cursor<'a> {
    fn new(toks: &'a [SpannedToken]) -> Self {
        Self { toks, i: 0 }
    }

    fn peek(&self) -> Option<&'a SpannedToken> {
        self.toks.get(self.i)
    }

    fn bump(&mut self) -> Option<&'a SpannedToken> {
        let t = self.toks.get(self.i);
        if t.is_some() {
            self.i += 1;
        }
        t
    }
}

/// `[A-Za-z_$][A-Za-z0-9_$-]*`; the tokenizer already limits the charset
fn is_parameter_name(word: &str) -> bool {
    word.chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}

/// `[A-Za-z0-9_$]*`
fn is_constraint_name(word: &str) -> bool {
    !word.contains('-')
}

// ============================================================================
// Validation & binding
// ============================================================================

/// Validates parsed segments and builds their constraints
///
/// Checks run in a fixed order. The all-optional check covers every segment
/// first; the remaining checks run part by part, so the first offending part
/// decides the error.
pub(crate) fn bind(
    template: &str,
    nodes: Vec<SegmentNode>,
    provider: &dyn ConstraintProvider,
) -> Result<Vec<Segment>, PatternError> {
    let fail = |kind| PatternError::new(kind, template);

    if nodes
        .iter()
        .any(|s| s.parts.len() > 1 && s.parts.iter().all(PartNode::is_optional))
    {
        return Err(fail(PatternErrorKind::AllOptionalSegment));
    }

    let total: usize = nodes.iter().map(|s| s.parts.len()).sum();
    let mut seen = HashSet::new();
    let mut index = 0;
    let mut segments = Vec::with_capacity(nodes.len());

    for node in nodes {
        let mut parts = Vec::with_capacity(node.parts.len());

        for part in node.parts {
            index += 1;

            match part {
                PartNode::Literal(text) => {
                    if text.contains('?') {
                        return Err(fail(PatternErrorKind::QuestionMarkInLiteral));
                    }
                    parts.push(Part::Literal { text });
                }
                PartNode::Parameter(p) => {
                    if p.quantifier.is_catch_all() && index != total {
                        return Err(fail(PatternErrorKind::MisplacedCatchAll));
                    }
                    if !seen.insert(p.name.clone()) {
                        return Err(fail(PatternErrorKind::DuplicateParameter(p.name)));
                    }

                    let default = match (p.quantifier, p.default) {
                        (Quantifier::ZeroOrMore, None) => Some(String::new()),
                        (Quantifier::ZeroOrMore, default) => default,
                        (_, Some(d)) if d.is_empty() => None,
                        (_, default) => default,
                    };

                    let constraints = p
                        .constraints
                        .into_iter()
                        .map(|c| {
                            provider.create(&c.name, &c.argument).map_err(|e| match e {
                                ConstraintError::Unknown => {
                                    fail(PatternErrorKind::UnknownConstraint(c.name.clone()))
                                }
                                ConstraintError::InvalidArgument(reason) => {
                                    fail(PatternErrorKind::InvalidConstraintArgument {
                                        name: c.name.clone(),
                                        argument: c.argument.clone(),
                                        reason,
                                    })
                                }
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;

                    parts.push(Part::Parameter(Parameter {
                        name: p.name,
                        quantifier: p.quantifier,
                        constraints,
                        default,
                    }));
                }
            }
        }

        segments.push(Segment { parts });
    }

    Ok(segments)
}

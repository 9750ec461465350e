//! Route template compilation
//!
//! template → tokens ([`tokenizer`]) → segment nodes ([`parser::parse`]) →
//! validated, constraint-bound segments ([`parser::bind`]) → anchored regex
//! ([`compile`]).

pub(crate) mod compile;
pub(crate) mod parser;
pub mod pattern;
pub mod tokenizer;

pub use pattern::{Parameter, Part, Quantifier, Segment};

//! Route template tokenizer
//!
//! Two modes, switched by braces:
//! - Outside braces: `/` is `Slash`, `{` is `LBrace`, everything else is a
//!   `Literal` run up to the next `/` or `{` (a lone `}` is literal text).
//! - Inside braces: `}` `:` `=` and the quantifiers `? * +` are single-char
//!   tokens, `(` starts an `Argument` read up to its balancing `)`, runs of
//!   `[A-Za-z0-9_$-]` are `Word`s and any other char is `Stray`.
//!
//! Stray chars are not errors here. The parser knows what it expected at that
//! point and reports a better message.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Slash,
    LBrace,
    RBrace,
    Colon,
    Equals,
    /// `?`, `*` or `+`
    Quantifier(char),
    /// Literal text outside braces
    Literal(String),
    /// Text between balanced parentheses, without the outer pair
    Argument(String),
    Word(String),
    Stray(char),
}

/// Token with byte offsets into the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub start: usize, // inclusive
    pub end: usize,   // exclusive
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeErrorKind {
    UnterminatedParameter,
    UnterminatedArgument,
    /// A closing `}` or `)` that does not match the innermost opener
    MismatchedDelimiter(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub at: usize,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenizeErrorKind::*;
        match self.kind {
            UnterminatedParameter => write!(f, "unterminated parameter at byte {}", self.at),
            UnterminatedArgument => write!(f, "unterminated argument at byte {}", self.at),
            MismatchedDelimiter(c) => write!(f, "mismatched {:?} at byte {}", c, self.at),
        }
    }
}

impl std::error::Error for TokenizeError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    OutsideBraces,
    InsideBraces { opened_at: usize },
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    mode: Mode,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            mode: Mode::OutsideBraces,
        }
    }

    pub fn tokenize_all(mut self) -> Result<Vec<SpannedToken>, TokenizeError> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token()? {
            out.push(tok);
        }
        Ok(out)
    }

    /// Returns the next token, or `Ok(None)` at end of input
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>, TokenizeError> {
        let Some(c) = self.peek_char() else {
            return match self.mode {
                Mode::OutsideBraces => Ok(None),
                Mode::InsideBraces { opened_at } => Err(TokenizeError {
                    kind: TokenizeErrorKind::UnterminatedParameter,
                    at: opened_at,
                }),
            };
        };

        let start = self.pos;
        let token = match self.mode {
            Mode::OutsideBraces => self.next_outside(c),
            Mode::InsideBraces { .. } => self.next_inside(c)?,
        };

        Ok(Some(SpannedToken {
            token,
            start,
            end: self.pos,
        }))
    }

    fn next_outside(&mut self, c: char) -> Token {
        match c {
            '/' => {
                self.pos += 1;
                Token::Slash
            }
            '{' => {
                self.mode = Mode::InsideBraces {
                    opened_at: self.pos,
                };
                self.pos += 1;
                Token::LBrace
            }
            _ => {
                let start = self.pos;
                let end = self.scan_while(|c| c != '/' && c != '{');
                self.pos = end;
                Token::Literal(self.input[start..end].to_string())
            }
        }
    }

    fn next_inside(&mut self, c: char) -> Result<Token, TokenizeError> {
        let token = match c {
            '}' => {
                self.mode = Mode::OutsideBraces;
                Token::RBrace
            }
            ':' => Token::Colon,
            '=' => Token::Equals,
            '?' | '*' | '+' => Token::Quantifier(c),
            '(' => return self.read_argument().map(Token::Argument),
            c if is_word_char(c) => {
                let start = self.pos;
                let end = self.scan_while(is_word_char);
                self.pos = end;
                return Ok(Token::Word(self.input[start..end].to_string()));
            }
            other => Token::Stray(other),
        };
        self.pos += c.len_utf8();
        Ok(token)
    }

    /// Reads `( ... )` with nested `{}`/`()` balanced; the cursor sits on `(`
    fn read_argument(&mut self) -> Result<String, TokenizeError> {
        let open = self.pos;
        let mut stack: Vec<char> = Vec::new();

        for (offset, c) in self.input[open..].char_indices() {
            match c {
                '(' => stack.push(')'),
                '{' => stack.push('}'),
                ')' | '}' => {
                    if stack.pop() != Some(c) {
                        return Err(TokenizeError {
                            kind: TokenizeErrorKind::MismatchedDelimiter(c),
                            at: open + offset,
                        });
                    }
                    if stack.is_empty() {
                        let close = open + offset;
                        self.pos = close + 1;
                        return Ok(self.input[open + 1..close].to_string());
                    }
                }
                _ => {}
            }
        }

        Err(TokenizeError {
            kind: TokenizeErrorKind::UnterminatedArgument,
            at: open,
        })
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn scan_while(&self, pred: impl Fn(char) -> bool) -> usize {
        self.input[self.pos..]
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.input.len(), |(i, _)| self.pos + i)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '-'
}

/// Tokenizes a whole template
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, TokenizeError> {
    Tokenizer::new(input).tokenize_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_literals_and_slashes() {
        assert_eq!(
            tokens("/home/a-b}c"),
            vec![
                Token::Slash,
                Token::Literal("home".into()),
                Token::Slash,
                Token::Literal("a-b}c".into()),
            ]
        );
    }

    #[test]
    fn test_parameter_tokens() {
        assert_eq!(
            tokens("/{id?:int:range(1,2):=(5)}"),
            vec![
                Token::Slash,
                Token::LBrace,
                Token::Word("id".into()),
                Token::Quantifier('?'),
                Token::Colon,
                Token::Word("int".into()),
                Token::Colon,
                Token::Word("range".into()),
                Token::Argument("1,2".into()),
                Token::Colon,
                Token::Equals,
                Token::Argument("5".into()),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_argument_keeps_nested_delimiters_and_slashes() {
        assert_eq!(
            tokens("{p:=(/a/{b}/(c))}"),
            vec![
                Token::LBrace,
                Token::Word("p".into()),
                Token::Colon,
                Token::Equals,
                Token::Argument("/a/{b}/(c)".into()),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_stray_chars() {
        assert_eq!(
            tokens("{id :}"),
            vec![
                Token::LBrace,
                Token::Word("id".into()),
                Token::Stray(' '),
                Token::Colon,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let toks = tokenize("/ab{c}").unwrap();
        assert_eq!((toks[1].start, toks[1].end), (1, 3));
        assert_eq!((toks[3].start, toks[3].end), (4, 5));
    }

    #[test]
    fn test_unterminated_parameter() {
        let err = tokenize("/{id").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnterminatedParameter);
        assert_eq!(err.at, 1);
    }

    #[test]
    fn test_unterminated_argument() {
        let err = tokenize("/{id:(abc}").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::MismatchedDelimiter('}'));

        let err = tokenize("/{id:(abc").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnterminatedArgument);
    }

    #[test]
    fn test_mismatched_nesting() {
        let err = tokenize("/{id:=({)}").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::MismatchedDelimiter(')'));
    }
}

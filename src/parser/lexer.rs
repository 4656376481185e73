//! Lexer (tokenizer) for calculator input
//!
//! Converts raw input text into a flat [`Token`] stream consumed by the parser.
//! Besides splitting the text, the lexer normalizes implicit products so the
//! parser never has to guess precedence for them:
//!
//! - `3x^2` becomes `( 3 * x ^ 2 )`
//! - `x` becomes `( 1 * x ^ 1 )`
//! - `2sin(30)` becomes `2 * sin ( 30 )`
//!
//! Tokens inserted by this normalization are *synthetic*: they carry no source
//! position and the parser never lets them climb past existing operators.

use std::fmt;
use thiserror::Error;

/// Token categories.
///
/// Variant order is significant: it is the ordinal order used when tokens are
/// sorted or compared, and operators expose their precedence tier through
/// [`TokenKind::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Number,
    Equal,
    Plus,
    Minus,
    Div,
    Mul,
    Power,
    LParen,
    RParen,
    Polynomial,
    Trig,
    Log,
    Sqrt,
    Diff,
    Variable,
    Factorial,
    Eoi,
}

impl TokenKind {
    /// Precedence tier of a binary operator, `None` for everything else.
    ///
    /// `=` binds loosest, then `+ -`, `/ *` and finally `^`.
    pub fn rank(self) -> Option<u8> {
        match self {
            TokenKind::Equal => Some(0),
            TokenKind::Plus | TokenKind::Minus => Some(1),
            TokenKind::Div | TokenKind::Mul => Some(2),
            TokenKind::Power => Some(3),
            _ => None,
        }
    }

    pub fn is_operator(self) -> bool {
        self.rank().is_some()
    }

    /// Keywords that scope the following bracketed group.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            TokenKind::Trig | TokenKind::Log | TokenKind::Sqrt | TokenKind::Diff
        )
    }

    /// Tokens that stand for a value on their own.
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::Variable
                | TokenKind::Polynomial
                | TokenKind::Factorial
        )
    }
}

/// A lexical unit with its literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Character offset in the input, `None` for synthetic tokens.
    pub position: Option<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position: Some(position),
        }
    }

    /// A token that does not come from the input text.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            position: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.position.is_none()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Character {character} is invalid (position {position})")]
    InvalidCharacter { character: char, position: usize },

    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("Invalid variable name '{name}' at position {position}")]
    InvalidIdentifier { name: String, position: usize },
}

/// Lexer for calculator input
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Tokenize the whole input and apply implicit-product normalization.
    ///
    /// The returned stream always ends with an [`TokenKind::Eoi`] token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let raw = self.scan()?;
        let tokens = normalize(raw);
        log::trace!(
            "lexed {} tokens: {}",
            tokens.len(),
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        );
        Ok(tokens)
    }

    /// Split the input into tokens without any rewriting.
    fn scan(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.position;

            let ch = match self.current_char() {
                Some(ch) => ch,
                None => {
                    tokens.push(Token::new(TokenKind::Eoi, "", start));
                    return Ok(tokens);
                }
            };

            if ch.is_ascii_digit() || ch == '.' {
                tokens.push(self.lex_number()?);
                continue;
            }

            if ch.is_ascii_alphabetic() {
                tokens.push(self.lex_word()?);
                continue;
            }

            let kind = match ch {
                '=' => TokenKind::Equal,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Mul,
                '/' => TokenKind::Div,
                '^' => TokenKind::Power,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                _ => {
                    return Err(LexError::InvalidCharacter {
                        character: ch,
                        position: start,
                    })
                }
            };
            self.advance();
            tokens.push(Token::new(kind, ch.to_string(), start));
        }
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.' {
                if seen_dot {
                    text.push(ch);
                    return Err(LexError::InvalidNumber {
                        text,
                        position: start,
                    });
                }
                seen_dot = true;
                text.push(ch);
            } else {
                break;
            }
            self.advance();
        }

        if text.ends_with('.') {
            return Err(LexError::InvalidNumber {
                text,
                position: start,
            });
        }

        if self.current_char() == Some('!') {
            self.advance();
            return Ok(Token::new(TokenKind::Factorial, text, start));
        }

        Ok(Token::new(TokenKind::Number, text, start))
    }

    fn lex_word(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut word = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphabetic() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match word.as_str() {
            "sin" | "cos" | "tan" => TokenKind::Trig,
            "log" => TokenKind::Log,
            "sqrt" => TokenKind::Sqrt,
            "diff" => TokenKind::Diff,
            w if w.len() == 1 && w.chars().all(|c| c.is_ascii_lowercase()) => TokenKind::Variable,
            _ => {
                return Err(LexError::InvalidIdentifier {
                    name: word,
                    position: start,
                })
            }
        };

        Ok(Token::new(kind, word, start))
    }
}

/// Rewrite implicit products into explicit, parenthesized groups.
fn normalize(raw: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(raw.len() * 2);
    // Bracket depths at which a variable group opened before `^(` must close.
    let mut pending_closes: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < raw.len() {
        let token = &raw[i];
        match token.kind {
            TokenKind::Variable => {
                let coefficient = match out.last() {
                    Some(last) if last.kind == TokenKind::Number => out.pop(),
                    _ => None,
                };
                out.push(Token::synthetic(TokenKind::LParen, "("));
                out.push(coefficient.unwrap_or_else(|| Token::synthetic(TokenKind::Number, "1")));
                out.push(Token::synthetic(TokenKind::Mul, "*"));
                out.push(token.clone());

                let next = raw.get(i + 1).map(|t| t.kind);
                let after = raw.get(i + 2).map(|t| t.kind);
                match (next, after) {
                    (Some(TokenKind::Power), Some(TokenKind::Number)) => {
                        out.push(raw[i + 1].clone());
                        out.push(raw[i + 2].clone());
                        out.push(Token::synthetic(TokenKind::RParen, ")"));
                        i += 3;
                        continue;
                    }
                    (Some(TokenKind::Power), Some(TokenKind::LParen)) => {
                        // Exponent group: close the variable group after its `)`.
                        out.push(raw[i + 1].clone());
                        pending_closes.push(depth);
                        i += 2;
                        continue;
                    }
                    _ => {
                        out.push(Token::synthetic(TokenKind::Power, "^"));
                        out.push(Token::synthetic(TokenKind::Number, "1"));
                        out.push(Token::synthetic(TokenKind::RParen, ")"));
                    }
                }
            }
            kind if kind.is_special() => {
                if out.last().is_some_and(|last| last.kind == TokenKind::Number) {
                    out.push(Token::synthetic(TokenKind::Mul, "*"));
                }
                out.push(token.clone());
            }
            TokenKind::LParen => {
                depth += 1;
                out.push(token.clone());
            }
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                out.push(token.clone());
                if pending_closes.last() == Some(&depth) {
                    pending_closes.pop();
                    out.push(Token::synthetic(TokenKind::RParen, ")"));
                }
            }
            _ => out.push(token.clone()),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        Lexer::new(input)
            .tokenize()
            .expect("lexing failed")
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eoi)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_plain_arithmetic() {
        assert_eq!(texts("2 + 3*4"), vec!["2", "+", "3", "*", "4"]);
    }

    #[test]
    fn test_variable_gets_unit_coefficient() {
        assert_eq!(texts("x"), vec!["(", "1", "*", "x", "^", "1", ")"]);
    }

    #[test]
    fn test_coefficient_and_exponent_are_scoped() {
        assert_eq!(texts("3x^2"), vec!["(", "3", "*", "x", "^", "2", ")"]);
    }

    #[test]
    fn test_bracketed_exponent_closes_after_group() {
        assert_eq!(
            texts("2x^(1+1)"),
            vec!["(", "2", "*", "x", "^", "(", "1", "+", "1", ")", ")"]
        );
    }

    #[test]
    fn test_implicit_product_before_function() {
        assert_eq!(texts("2sin(30)"), vec!["2", "*", "sin", "(", "30", ")"]);
    }

    #[test]
    fn test_synthetic_tokens_have_no_position() {
        let tokens = Lexer::new("x").tokenize().expect("lexing failed");
        assert!(tokens[0].is_synthetic());
        assert!(!tokens[3].is_synthetic());
        assert_eq!(tokens[3].kind, TokenKind::Variable);
    }

    #[test]
    fn test_factorial_token() {
        let tokens = Lexer::new("5!").tokenize().expect("lexing failed");
        assert_eq!(tokens[0].kind, TokenKind::Factorial);
        assert_eq!(tokens[0].text, "5");
    }

    #[test]
    fn test_keywords() {
        let kinds: Vec<TokenKind> = Lexer::new("cos log sqrt diff")
            .tokenize()
            .expect("lexing failed")
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Trig,
                TokenKind::Log,
                TokenKind::Sqrt,
                TokenKind::Diff,
                TokenKind::Eoi
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Lexer::new("2 # 3").tokenize(),
            Err(LexError::InvalidCharacter { character: '#', .. })
        ));
        assert!(matches!(
            Lexer::new("3.").tokenize(),
            Err(LexError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Lexer::new("1.2.3").tokenize(),
            Err(LexError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Lexer::new("abc").tokenize(),
            Err(LexError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            Lexer::new("X").tokenize(),
            Err(LexError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_operator_ranks() {
        assert!(TokenKind::Plus.rank() < TokenKind::Mul.rank());
        assert_eq!(TokenKind::Div.rank(), TokenKind::Mul.rank());
        assert!(TokenKind::Equal.rank() < TokenKind::Minus.rank());
        assert_eq!(TokenKind::Number.rank(), None);
    }
}

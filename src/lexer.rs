//! Tokenizer: raw expression text to a flat token sequence.
//!
//! Tokenizing is two passes. Normalization collapses line breaks to `;`,
//! strips `#`-to-end-of-statement comments, and removes whitespace everywhere
//! except inside string literals (string spans are located first and kept
//! verbatim). The scan then partitions the normalized text against a single
//! alternation of token-class patterns; classes are tried in a fixed priority
//! order, with multi-character operator lexemes listed ahead of their
//! one-character prefixes because alternation is leftmost-first. Any byte no
//! class recognizes raises [`TokenizingError`]; nothing is skipped, so
//! concatenating the matched lexemes always reproduces the normalized input.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TokenizingError;
use crate::number::Number;

/// A typed lexical unit plus the exact slice of normalized text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched lexeme, quotes and all.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(Number),
    /// String literal content, quotes removed
    String(String),
    Boolean(bool),
    Null,
    Word(String),
    LeftRound,
    RightRound,
    LeftSquare,
    RightSquare,
    LeftCurly,
    RightCurly,
    /// `+ - * / % **`
    ArithmeticOperator(String),
    /// `& | ^` and `~` runs
    BitwiseOperator(String),
    /// `&& || == != < > <= >=` and `!` runs
    LogicalOperator(String),
    /// `=`, or a compound form carrying its operator prefix (`+=` → `+`)
    Assignment(Option<String>),
    Comma,
    Colon,
    Dot,
    LineSeparator,
}

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[^;]*").expect("comment pattern"));

static STRING_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).expect("string pattern"));

// Class order encodes match priority; see the module docs.
static SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"(?P<group>[()\[\]{}])",
        r#"|(?P<string>"[^"]*"|'[^']*')"#,
        r"|(?P<null>\bnull\b)",
        r"|(?P<boolean>\btrue\b|\bfalse\b)",
        r"|(?P<word>[a-zA-Z_]\w*)",
        r"|(?P<number>\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)",
        r"|(?P<compound>\*\*=|&&=|\|\|=|[+\-*/%&|^]=)",
        r"|(?P<logical>&&|\|\||==|!=|<=|>=|<|>|!+)",
        r"|(?P<assign>=)",
        r"|(?P<arithmetic>\*\*|[+\-*/%])",
        r"|(?P<bitwise>~+|[&|^])",
        r"|(?P<comma>,)",
        r"|(?P<colon>:)",
        r"|(?P<dot>\.)",
        r"|(?P<separator>;)",
        r"|(?P<unknown>.)",
    ))
    .expect("token pattern")
});

/// Runs normalization plus the priority scan and holds the result.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    normalized: String,
    tokens: Vec<Token>,
}

impl Tokenizer {
    pub fn new(text: &str) -> Result<Tokenizer, TokenizingError> {
        let normalized = Tokenizer::normalize(text);
        let tokens = scan(&normalized)?;
        Ok(Tokenizer { normalized, tokens })
    }

    /// The input after line-break unification, comment stripping, and
    /// whitespace removal outside string literals.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn normalize(text: &str) -> String {
        let text = text.replace("\r\n", ";").replace(['\n', '\r'], ";");
        let text = COMMENT.replace_all(&text, "");
        strip_whitespace_outside_strings(&text)
    }
}

/// Convenience wrapper over [`Tokenizer::new`].
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizingError> {
    Ok(Tokenizer::new(text)?.into_tokens())
}

fn strip_whitespace_outside_strings(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for span in STRING_SPAN.find_iter(text) {
        result.extend(text[last..span.start()].chars().filter(|c| !c.is_whitespace()));
        result.push_str(span.as_str());
        last = span.end();
    }
    result.extend(text[last..].chars().filter(|c| !c.is_whitespace()));
    result
}

fn scan(normalized: &str) -> Result<Vec<Token>, TokenizingError> {
    let mut tokens = Vec::new();
    for captures in SCAN.captures_iter(normalized) {
        let text = captures
            .get(0)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        let kind = if let Some(m) = captures.name("group") {
            match m.as_str() {
                "(" => TokenKind::LeftRound,
                ")" => TokenKind::RightRound,
                "[" => TokenKind::LeftSquare,
                "]" => TokenKind::RightSquare,
                "{" => TokenKind::LeftCurly,
                _ => TokenKind::RightCurly,
            }
        } else if let Some(m) = captures.name("string") {
            let inner = m.as_str();
            TokenKind::String(inner[1..inner.len() - 1].to_string())
        } else if captures.name("null").is_some() {
            TokenKind::Null
        } else if let Some(m) = captures.name("boolean") {
            TokenKind::Boolean(m.as_str() == "true")
        } else if let Some(m) = captures.name("word") {
            TokenKind::Word(m.as_str().to_string())
        } else if let Some(m) = captures.name("number") {
            match Number::parse_literal(m.as_str()) {
                Some(number) => TokenKind::Number(number),
                None => return Err(TokenizingError::new(m.as_str())),
            }
        } else if let Some(m) = captures.name("compound") {
            let lexeme = m.as_str();
            TokenKind::Assignment(Some(lexeme[..lexeme.len() - 1].to_string()))
        } else if let Some(m) = captures.name("logical") {
            TokenKind::LogicalOperator(m.as_str().to_string())
        } else if captures.name("assign").is_some() {
            TokenKind::Assignment(None)
        } else if let Some(m) = captures.name("arithmetic") {
            TokenKind::ArithmeticOperator(m.as_str().to_string())
        } else if let Some(m) = captures.name("bitwise") {
            TokenKind::BitwiseOperator(m.as_str().to_string())
        } else if captures.name("comma").is_some() {
            TokenKind::Comma
        } else if captures.name("colon").is_some() {
            TokenKind::Colon
        } else if captures.name("dot").is_some() {
            TokenKind::Dot
        } else if captures.name("separator").is_some() {
            TokenKind::LineSeparator
        } else {
            return Err(TokenizingError::new(text));
        };
        tokens.push(Token { kind, text });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_keeps_string_interiors() {
        assert_eq!(Tokenizer::normalize("1 + 2"), "1+2");
        assert_eq!(Tokenizer::normalize("'a b' + x"), "'a b'+x");
        assert_eq!(Tokenizer::normalize("1+2\n3+4"), "1+2;3+4");
        assert_eq!(Tokenizer::normalize("2 + 3 # comment"), "2+3");
    }

    #[test]
    fn scan_partitions_the_whole_input() {
        let tokenizer = Tokenizer::new("2*(x + 1)").unwrap();
        let joined: String = tokenizer.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, tokenizer.normalized());
    }

    #[test]
    fn unknown_bytes_fail_fast() {
        let err = Tokenizer::new("1 + 2 @ 3").unwrap_err();
        assert_eq!(err.token, "@");
    }
}

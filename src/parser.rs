//! Parser: token sequence to parsing components.
//!
//! The parser resolves structure only. It matches balanced delimiter groups,
//! splits argument lists on top-level commas, tells hash literals from
//! blocks (a curly group is a hash when its interior has a top-level colon),
//! attaches square groups and dot calls to the operand before them, decides
//! unary versus binary position for operator tokens, and inserts the
//! implicit multiplication between adjacent operands. What an expression
//! means is the AST builder's job.

use crate::ast::node::{OperatorSymbol, UnaryOp};
use crate::error::ParsingError;
use crate::lexer::{Token, TokenKind};
use crate::parsing::{Component, GroupKind};

/// Parses a token sequence into a component tree.
pub fn parse(tokens: &[Token]) -> Result<Vec<Component>, ParsingError> {
    Parser {
        tokens,
        position: 0,
        components: Vec::new(),
    }
    .run()
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    components: Vec<Component>,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Vec<Component>, ParsingError> {
        while self.position < self.tokens.len() {
            self.step()?;
        }
        Ok(self.components)
    }

    fn step(&mut self) -> Result<(), ParsingError> {
        let token = &self.tokens[self.position];
        match &token.kind {
            TokenKind::Number(n) => {
                self.push_operand(Component::Number(*n));
                self.position += 1;
            }
            TokenKind::String(s) => {
                self.push_operand(Component::String(s.clone()));
                self.position += 1;
            }
            TokenKind::Boolean(b) => {
                self.push_operand(Component::Boolean(*b));
                self.position += 1;
            }
            TokenKind::Null => {
                self.push_operand(Component::Null);
                self.position += 1;
            }
            TokenKind::Word(name) => self.word(name.clone())?,
            TokenKind::LeftRound => self.round_group()?,
            TokenKind::LeftSquare => self.square_group()?,
            TokenKind::LeftCurly => self.curly_group()?,
            TokenKind::Dot => self.dot()?,
            TokenKind::ArithmeticOperator(op)
            | TokenKind::BitwiseOperator(op)
            | TokenKind::LogicalOperator(op) => self.operator(op.clone())?,
            TokenKind::Assignment(op) => self.assignment(op.clone())?,
            TokenKind::Comma => {
                return Err(ParsingError::UnexpectedToken(
                    "comma outside of a group".into(),
                ));
            }
            TokenKind::Colon => {
                return Err(ParsingError::UnexpectedToken(
                    "colon outside of a hash".into(),
                ));
            }
            TokenKind::RightRound | TokenKind::RightSquare | TokenKind::RightCurly => {
                return Err(ParsingError::UnbalancedGroup(format!(
                    "unmatched closing \"{}\"",
                    token.text
                )));
            }
            TokenKind::LineSeparator => {
                self.components.push(Component::LineSeparator);
                self.position += 1;
            }
        }
        Ok(())
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + offset).map(|t| &t.kind)
    }

    fn previous_is_operand(&self) -> bool {
        self.components.last().is_some_and(Component::is_operand)
    }

    /// Pushes a component that starts a new operand, multiplying by
    /// juxtaposition when one operand directly follows another (`2x`,
    /// `(x+1)(y+2)`).
    fn push_operand(&mut self, component: Component) {
        if self.previous_is_operand() {
            self.components.push(Component::Operator(OperatorSymbol::Times));
        }
        self.components.push(component);
    }

    fn word(&mut self, name: String) -> Result<(), ParsingError> {
        if matches!(self.peek_kind(1), Some(TokenKind::LeftRound)) {
            let (args, consumed) = self.arguments_at(self.position + 1)?;
            self.push_operand(Component::Function { name, args });
            self.position += 1 + consumed;
        } else {
            self.push_operand(Component::Variable(name));
            self.position += 1;
        }
        Ok(())
    }

    fn round_group(&mut self) -> Result<(), ParsingError> {
        let close = self.matching_close(self.position)?;
        let components = parse(&self.tokens[self.position + 1..close])?;
        self.push_operand(Component::Group {
            kind: GroupKind::Round,
            components,
        });
        self.position = close + 1;
        Ok(())
    }

    /// A square group is indexing when it follows an operand, otherwise a
    /// list literal.
    fn square_group(&mut self) -> Result<(), ParsingError> {
        let indexing = self.previous_is_operand();
        let (args, consumed) = self.arguments_at(self.position)?;
        if indexing {
            self.components.push(Component::Indexing(args));
        } else {
            self.components.push(Component::List(args));
        }
        self.position += consumed;
        Ok(())
    }

    /// A curly group with a top-level colon is a hash literal, otherwise a
    /// block. An empty `{}` is the empty hash.
    fn curly_group(&mut self) -> Result<(), ParsingError> {
        let close = self.matching_close(self.position)?;
        let inner = &self.tokens[self.position + 1..close];
        let component = if inner.is_empty() {
            Component::Hash(Vec::new())
        } else if top_level_colon_index(inner).is_some() {
            Component::Hash(parse_hash_pairs(inner)?)
        } else {
            Component::Group {
                kind: GroupKind::Curly,
                components: parse(inner)?,
            }
        };
        self.push_operand(component);
        self.position = close + 1;
        Ok(())
    }

    fn dot(&mut self) -> Result<(), ParsingError> {
        if !self.previous_is_operand() {
            return Err(ParsingError::UnexpectedToken(
                "dot with nothing to attach to".into(),
            ));
        }
        let name = match self.peek_kind(1) {
            Some(TokenKind::Word(name)) => name.clone(),
            _ => {
                return Err(ParsingError::UnexpectedToken(
                    "expected a name after dot".into(),
                ));
            }
        };
        if matches!(self.peek_kind(2), Some(TokenKind::LeftRound)) {
            let (args, consumed) = self.arguments_at(self.position + 2)?;
            self.components.push(Component::DotOperator { name, args });
            self.position += 2 + consumed;
        } else {
            self.components.push(Component::DotWord(name));
            self.position += 2;
        }
        Ok(())
    }

    fn operator(&mut self, text: String) -> Result<(), ParsingError> {
        if self.previous_is_operand() {
            let symbol = binary_symbol(&text).ok_or_else(|| {
                ParsingError::UnexpectedToken(format!(
                    "\"{}\" cannot be used in binary position",
                    text
                ))
            })?;
            self.components.push(Component::Operator(symbol));
        } else {
            let op = unary_op(&text).ok_or_else(|| {
                ParsingError::UnexpectedToken(format!(
                    "\"{}\" cannot be used in unary position",
                    text
                ))
            })?;
            self.components.push(Component::UnaryOperator(op));
        }
        self.position += 1;
        Ok(())
    }

    fn assignment(&mut self, op: Option<String>) -> Result<(), ParsingError> {
        if !self.previous_is_operand() {
            return Err(ParsingError::UnexpectedToken(
                "assignment without a target".into(),
            ));
        }
        let component = match op {
            None => Component::Assignment,
            Some(prefix) => {
                let symbol = binary_symbol(&prefix).ok_or_else(|| {
                    ParsingError::UnexpectedToken(format!(
                        "invalid compound assignment \"{}=\"",
                        prefix
                    ))
                })?;
                Component::CompoundAssignment(symbol)
            }
        };
        self.components.push(component);
        self.position += 1;
        Ok(())
    }

    /// Index of the closer matching the opener at `start`.
    fn matching_close(&self, start: usize) -> Result<usize, ParsingError> {
        let mut stack = Vec::new();
        for (offset, token) in self.tokens[start..].iter().enumerate() {
            match &token.kind {
                TokenKind::LeftRound => stack.push(TokenKind::RightRound),
                TokenKind::LeftSquare => stack.push(TokenKind::RightSquare),
                TokenKind::LeftCurly => stack.push(TokenKind::RightCurly),
                TokenKind::RightRound | TokenKind::RightSquare | TokenKind::RightCurly => {
                    match stack.pop() {
                        Some(expected) if expected == token.kind => {
                            if stack.is_empty() {
                                return Ok(start + offset);
                            }
                        }
                        _ => {
                            return Err(ParsingError::UnbalancedGroup(format!(
                                "unmatched closing \"{}\"",
                                token.text
                            )));
                        }
                    }
                }
                _ => {}
            }
        }
        Err(ParsingError::UnbalancedGroup(format!(
            "unclosed \"{}\"",
            self.tokens[start].text
        )))
    }

    /// Parses the group opening at `start` as an argument list; returns the
    /// parsed arguments and the token count consumed including delimiters.
    fn arguments_at(&self, start: usize) -> Result<(Vec<Vec<Component>>, usize), ParsingError> {
        let close = self.matching_close(start)?;
        let arguments = split_arguments(&self.tokens[start + 1..close])?;
        let mut parsed = Vec::with_capacity(arguments.len());
        for argument in arguments {
            parsed.push(parse(argument)?);
        }
        Ok((parsed, close - start + 1))
    }
}

/// Splits a balanced token slice on top-level commas. Empty arguments
/// (leading, trailing, or doubled commas) are rejected; an empty slice is an
/// empty argument list.
fn split_arguments(tokens: &[Token]) -> Result<Vec<&[Token]>, ParsingError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut last = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftRound | TokenKind::LeftSquare | TokenKind::LeftCurly => depth += 1,
            TokenKind::RightRound | TokenKind::RightSquare | TokenKind::RightCurly => depth -= 1,
            TokenKind::Comma if depth == 0 => {
                if i == last {
                    return Err(ParsingError::InvalidArguments("empty argument".into()));
                }
                arguments.push(&tokens[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    if last == tokens.len() {
        return Err(ParsingError::InvalidArguments("empty argument".into()));
    }
    arguments.push(&tokens[last..]);
    Ok(arguments)
}

fn top_level_colon_index(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftRound | TokenKind::LeftSquare | TokenKind::LeftCurly => depth += 1,
            TokenKind::RightRound | TokenKind::RightSquare | TokenKind::RightCurly => depth -= 1,
            TokenKind::Colon if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_hash_pairs(
    tokens: &[Token],
) -> Result<Vec<(Vec<Component>, Vec<Component>)>, ParsingError> {
    let entries = split_arguments(tokens)?;
    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        let colon = top_level_colon_index(entry).ok_or_else(|| {
            ParsingError::UnexpectedToken("hash entry is missing a colon".into())
        })?;
        let (key, value) = (&entry[..colon], &entry[colon + 1..]);
        if key.is_empty() || value.is_empty() {
            return Err(ParsingError::InvalidArguments(
                "hash entry is missing a key or value".into(),
            ));
        }
        if top_level_colon_index(value).is_some() {
            return Err(ParsingError::UnexpectedToken(
                "unexpected second colon in hash entry".into(),
            ));
        }
        pairs.push((parse(key)?, parse(value)?));
    }
    Ok(pairs)
}

fn binary_symbol(text: &str) -> Option<OperatorSymbol> {
    let symbol = match text {
        "+" => OperatorSymbol::Plus,
        "-" => OperatorSymbol::Minus,
        "*" => OperatorSymbol::Times,
        "/" => OperatorSymbol::Divide,
        "%" => OperatorSymbol::Modulo,
        "**" => OperatorSymbol::Exponent,
        "&" => OperatorSymbol::BitwiseAnd,
        "|" => OperatorSymbol::BitwiseOr,
        "^" => OperatorSymbol::BitwiseXor,
        "&&" => OperatorSymbol::LogicalAnd,
        "||" => OperatorSymbol::LogicalOr,
        "==" => OperatorSymbol::Equal,
        "!=" => OperatorSymbol::NotEqual,
        "<" => OperatorSymbol::LessThan,
        ">" => OperatorSymbol::GreaterThan,
        "<=" => OperatorSymbol::LessThanOrEqual,
        ">=" => OperatorSymbol::GreaterThanOrEqual,
        _ => return None,
    };
    Some(symbol)
}

/// Runs of `~` or `!` collapse by parity: an even run is the identity.
fn unary_op(text: &str) -> Option<UnaryOp> {
    match text {
        "+" => Some(UnaryOp::Plus),
        "-" => Some(UnaryOp::Minus),
        t if !t.is_empty() && t.chars().all(|c| c == '~') => {
            if t.len() % 2 == 0 {
                Some(UnaryOp::Identity)
            } else {
                Some(UnaryOp::BitwiseNot)
            }
        }
        t if !t.is_empty() && t.chars().all(|c| c == '!') => {
            if t.len() % 2 == 0 {
                Some(UnaryOp::Identity)
            } else {
                Some(UnaryOp::LogicalNot)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn components(text: &str) -> Vec<Component> {
        parse(&tokenize(text).unwrap()).unwrap()
    }

    #[test]
    fn juxtaposition_inserts_multiplication() {
        let parsed = components("2x");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1], Component::Operator(OperatorSymbol::Times));
    }

    #[test]
    fn curly_groups_split_on_top_level_colon() {
        assert!(matches!(components("{'a': 1}")[0], Component::Hash(_)));
        assert!(matches!(
            components("{x = 1; x}")[0],
            Component::Group { kind: GroupKind::Curly, .. }
        ));
    }

    #[test]
    fn unbalanced_groups_are_rejected() {
        let tokens = tokenize("(1 + 2").unwrap();
        assert!(matches!(
            parse(&tokens),
            Err(ParsingError::UnbalancedGroup(_))
        ));
    }

    #[test]
    fn square_group_position_decides_list_or_indexing() {
        assert!(matches!(components("[1, 2]")[0], Component::List(_)));
        let parsed = components("a[0]");
        assert!(matches!(parsed[0], Component::Variable(_)));
        assert!(matches!(parsed[1], Component::Indexing(_)));
    }
}

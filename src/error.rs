//! Error types for every stage of the pipeline.
//!
//! Each stage owns one error type (tokenizing, parsing, AST building,
//! evaluation); [`Error`] collects them so the whole
//! text-to-value pipeline composes with `?`. None of these are recovered
//! internally; the embedding host decides how to present them.

/// The tokenizer met a byte sequence no token class matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizingError {
    /// The unrecognized slice of the normalized input.
    pub token: String,
}

impl TokenizingError {
    pub fn new(token: impl Into<String>) -> Self {
        TokenizingError {
            token: token.into(),
        }
    }
}

impl std::fmt::Display for TokenizingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unexpected token: \"{}\"", self.token)
    }
}

impl std::error::Error for TokenizingError {}

/// Errors raised while shaping tokens into parsing components.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsingError {
    /// A group delimiter was opened but never closed, or closed without opening
    UnbalancedGroup(String),

    /// A token appeared somewhere its form does not allow
    UnexpectedToken(String),

    /// A square/round/curly group had the wrong argument shape for its position
    InvalidArguments(String),
}

impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsingError::UnbalancedGroup(msg) => write!(f, "Unbalanced group: {}", msg),
            ParsingError::UnexpectedToken(msg) => write!(f, "Unexpected token: {}", msg),
            ParsingError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
        }
    }
}

impl std::error::Error for ParsingError {}

/// Structural failures while reducing components to a single AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct AstError {
    pub message: String,
}

impl AstError {
    pub fn new(message: impl Into<String>) -> Self {
        AstError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AstError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AST error: {}", self.message)
    }
}

impl std::error::Error for AstError {}

/// Errors raised while evaluating a structurally valid AST.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable lookup failed during strict evaluation
    UndefinedVariable(String),

    /// Function lookup failed during strict evaluation or invocation
    UndefinedFunction(String),

    /// Structurally valid but semantically malformed: assigning out of range,
    /// indexing a non-container, defining a function over unresolvable names
    InvalidExpression(String),

    /// Arithmetic or type failure while applying an operator or function
    Calculation(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UndefinedVariable(name) => {
                write!(f, "Undefined variable: {} is not defined", name)
            }
            EvalError::UndefinedFunction(name) => {
                write!(f, "Undefined function: {} is not defined", name)
            }
            EvalError::InvalidExpression(msg) => write!(f, "Invalid expression: {}", msg),
            EvalError::Calculation(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Any failure from the full text-to-value pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Tokenizing(TokenizingError),
    Parsing(ParsingError),
    Ast(AstError),
    Eval(EvalError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Tokenizing(e) => write!(f, "{}", e),
            Error::Parsing(e) => write!(f, "{}", e),
            Error::Ast(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Tokenizing(e) => Some(e),
            Error::Parsing(e) => Some(e),
            Error::Ast(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<TokenizingError> for Error {
    fn from(e: TokenizingError) -> Self {
        Error::Tokenizing(e)
    }
}

impl From<ParsingError> for Error {
    fn from(e: ParsingError) -> Self {
        Error::Parsing(e)
    }
}

impl From<AstError> for Error {
    fn from(e: AstError) -> Self {
        Error::Ast(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

use std::fmt;
use std::rc::Rc;

/// Error codes prefixed by owner: F = function call contract, E = body
/// evaluation, R = registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Call contract
    TypeMismatch,       // F001 wrong value kind for a parameter
    ArgumentCount,      // F002 arity outside what the parameters accept
    ArgumentRange,      // F003 value outside the function's domain
    Unit,               // F004 incompatible or disallowed unit
    UndefinedFunction,  // F005 name not registered
    NoMatchingOverload, // F006 no candidate accepts the call arity

    // Body evaluation
    UndefinedVariable, // E001
    StackOverflow,     // E002 nested calls exceeded `Options::max_depth`
    MissingReturn,     // E003 function body finished without `@return`

    // Registry
    Signature, // R001 malformed signature string
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeMismatch       => "F001",
            Self::ArgumentCount      => "F002",
            Self::ArgumentRange      => "F003",
            Self::Unit               => "F004",
            Self::UndefinedFunction  => "F005",
            Self::NoMatchingOverload => "F006",
            Self::UndefinedVariable  => "E001",
            Self::StackOverflow      => "E002",
            Self::MissingReturn      => "E003",
            Self::Signature          => "R001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Location ─────────────────────────────────────────────────────────────────

/// Source file and line of a call site or value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: Rc<str>,
    pub line: usize,
}

impl Location {
    pub fn new(path: impl Into<Rc<str>>, line: usize) -> Self {
        Self { path: path.into(), line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

// ─── Error ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[{}] {}{}", .code, prefix(.location), .message)]
pub struct Error {
    pub code: ErrorCode,
    pub location: Option<Location>,
    pub message: String,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn prefix(location: &Option<Location>) -> String {
    location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default()
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, location: None, message: message.into() }
    }

    /// Attach a location unless one is already present. The innermost call
    /// site wins.
    pub fn at(mut self, location: Option<&Location>) -> Self {
        if self.location.is_none() {
            self.location = location.cloned();
        }
        self
    }

    /// Prefix the message, e.g. with the parameter that was being read.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self { Self::new(ErrorCode::TypeMismatch, message) }
    pub fn argument_count(message: impl Into<String>) -> Self { Self::new(ErrorCode::ArgumentCount, message) }
    pub fn argument_range(message: impl Into<String>) -> Self { Self::new(ErrorCode::ArgumentRange, message) }
    pub fn unit(message: impl Into<String>) -> Self { Self::new(ErrorCode::Unit, message) }
    pub fn signature(message: impl Into<String>) -> Self { Self::new(ErrorCode::Signature, message) }

    pub fn undefined_function(name: &str) -> Self {
        Self::new(ErrorCode::UndefinedFunction, format!("undefined function `{name}`"))
    }

    pub fn no_matching_overload(name: &str, arity: usize) -> Self {
        Self::new(
            ErrorCode::NoMatchingOverload,
            format!("no overload of `{name}` accepts {arity} argument(s)"),
        )
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(ErrorCode::UndefinedVariable, format!("undefined variable `${name}`"))
    }
}

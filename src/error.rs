use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::node::Node;

/// Source position of an input node.
///
/// Renders as `file:line: ` when the file is known and as nothing otherwise,
/// so it can be used directly as a message prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn of(node: &Node) -> Self {
        Self {
            file: node.file.clone(),
            line: node.line,
        }
    }

    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}: ", self.file, self.line)
        } else {
            Ok(())
        }
    }
}

/// Whether a definition describes a leaf directive or a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directive,
    Block,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directive => f.write_str("directive"),
            NodeKind::Block => f.write_str("block"),
        }
    }
}

/// A string could not be converted into a value's target type.
#[derive(Debug, Error, PartialEq)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ValueError {
    #[error("invalid boolean '{input}', expected 'true' or 'false'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::value::bool)))]
    InvalidBool { input: String },

    #[error("invalid integer '{input}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::value::int)))]
    InvalidInt {
        input: String,
        source: ParseIntError,
    },

    #[error("invalid float '{input}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::value::float)))]
    InvalidFloat {
        input: String,
        source: ParseFloatError,
    },

    #[error("invalid value '{input}': {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::value::custom)))]
    Custom { input: String, reason: String },
}

/// A schema was declared inconsistently. These are programming mistakes in the
/// schema itself and should stop startup.
#[derive(Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum SchemaError {
    #[error("node '{node}': required argument {position} follows optional argument(s)")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(blockfig::schema::required_after_optional))
    )]
    RequiredAfterOptional { node: String, position: usize },

    #[error("node '{node}': variadic argument is not the last one")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(blockfig::schema::variadic_not_last))
    )]
    VariadicNotLast { node: String },
}

/// Error produced while evaluating an input tree against a schema.
///
/// The first error aborts the whole walk; values bound before it stay written.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum EvalError {
    #[error("{at}node '{name}' is not allowed here")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::not_allowed)))]
    NotAllowed { at: Location, name: String },

    #[error("{at}node '{name}' may not be a block")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::not_a_block)))]
    NotABlock { at: Location, name: String },

    #[error("{at}{kind} '{name}' expects at least {min} arguments, got {got}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::too_few_args)))]
    TooFewArgs {
        at: Location,
        kind: NodeKind,
        name: String,
        min: usize,
        got: usize,
    },

    #[error("{at}{kind} '{name}' expects a maximum of {max} arguments, got {got}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::too_many_args)))]
    TooManyArgs {
        at: Location,
        kind: NodeKind,
        name: String,
        max: usize,
        got: usize,
    },

    #[error("{at}{kind} '{name}' may not be repeated")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::repeated)))]
    Repeated {
        at: Location,
        kind: NodeKind,
        name: String,
    },

    #[error("{at}unknown module '{module}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::unknown_module)))]
    UnknownModule { at: Location, module: String },

    #[error("{at}unknown directive or block '{name}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::unknown_node)))]
    UnknownNode { at: Location, name: String },

    #[error("{at}invalid argument {position} to '{name}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::invalid_argument)))]
    InvalidArgument {
        at: Location,
        name: String,
        position: usize,
        source: ValueError,
    },

    #[error("{at}{message}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::node)))]
    Node { at: Location, message: String },

    #[error("{0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(blockfig::handler)))]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl EvalError {
    /// A free-form error located at `node`. Intended for node handlers.
    pub fn at(node: &Node, message: impl Into<String>) -> Self {
        EvalError::Node {
            at: Location::of(node),
            message: message.into(),
        }
    }

    /// Wrap a foreign error raised inside a handler. Its message is kept as is.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        EvalError::Handler(err.into())
    }

    /// Source location of the failing node, if the error carries one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            EvalError::NotAllowed { at, .. }
            | EvalError::NotABlock { at, .. }
            | EvalError::TooFewArgs { at, .. }
            | EvalError::TooManyArgs { at, .. }
            | EvalError::Repeated { at, .. }
            | EvalError::UnknownModule { at, .. }
            | EvalError::UnknownNode { at, .. }
            | EvalError::InvalidArgument { at, .. }
            | EvalError::Node { at, .. } => Some(at),
            EvalError::Handler(_) => None,
        }
    }
}

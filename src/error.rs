// ABOUTME: Error types for reading and evaluating Lisp programs

use crate::value::Value;
use thiserror::Error;

/// Every failure the interpreter can surface. Errors unwind with `?` to the
/// nearest top-level form boundary, where the REPL reports them and carries
/// on; the batch file runner aborts instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    /// Malformed source text; carries the code-point offset.
    #[error("parse error: {pos}: {msg}")]
    Syntax { pos: usize, msg: String },

    #[error("unbound variable: '{0}'")]
    Unbound(String),

    /// The head of an application did not evaluate to a function.
    #[error("<{form}> of type <{type_name}> is not applicable")]
    NotApplicable { form: String, type_name: &'static str },

    #[error("empty list is not valid")]
    EmptyApplication,

    #[error("too many arguments")]
    TooManyArguments,

    #[error("not enough arguments")]
    NotEnoughArguments,

    /// A special form used with the wrong shape.
    #[error("{form}: {msg}")]
    WrongSyntax { form: &'static str, msg: String },

    #[error("unquote out of quasiquote expression")]
    UnquoteOutsideQuasi,

    /// `,@` produced a non-list in a non-terminal position.
    #[error("error unpacking (x y . z ...)")]
    SpliceShape,

    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{function}: {message}")]
    Runtime {
        function: &'static str,
        message: String,
    },

    #[error("{0}")]
    Io(String),
}

impl LispError {
    pub fn type_mismatch(function: &'static str, expected: &'static str, got: &Value) -> Self {
        LispError::TypeMismatch {
            function,
            expected,
            actual: got.type_name(),
        }
    }

    pub fn wrong_syntax(form: &'static str, msg: impl Into<String>) -> Self {
        LispError::WrongSyntax {
            form,
            msg: msg.into(),
        }
    }

    pub fn runtime(function: &'static str, message: impl Into<String>) -> Self {
        LispError::Runtime {
            function,
            message: message.into(),
        }
    }
}

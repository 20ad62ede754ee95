//! # Built-in Form Registry
//!
//! The initial bindings seeded into the global environment at startup,
//! one module per category:
//!
//! - **[arithmetic]**: `+`, `-`, `*`, `/`
//! - **[comparison]**: `=`, `eq?`, `<`, `<=`, `>`, `>=`
//! - **[lists]**: `car`, `cdr`, `cons`, `null?`, `atom?`, `symbol?`
//! - **[forms]**: `define`, `set!`, `lambda`, `if`, the quote family,
//!   `defmacro`
//! - **[meta]**: `eval`, `apply`, `macroexpand`, `gensym`, `defined?`,
//!   `version`
//! - **[console]**: `display`, `println`, `debug`
//! - **[strings]**: `strlen`, `char`
//!
//! Special forms are registered as native macros: they receive their
//! argument chain unevaluated and the evaluator does not re-evaluate what
//! they return.

use crate::env::Environment;
use crate::error::LispError;
use crate::value::{list_parts, Value};
use std::sync::Arc;

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod forms;
pub mod lists;
pub mod meta;
pub mod strings;

/// Seeds the global environment with every built-in form and constant.
pub fn register(env: &Arc<Environment>) {
    env.set("nil", Value::Nil);
    env.set("true", Value::Bool(true));
    env.set("false", Value::Bool(false));

    arithmetic::register(env);
    comparison::register(env);
    lists::register(env);
    forms::register(env);
    meta::register(env);
    console::register(env);
    strings::register(env);
}

/// Collects a native's argument chain into a Vec.
pub(crate) fn args_vec(function: &'static str, args: &Value) -> Result<Vec<Value>, LispError> {
    match list_parts(args) {
        (items, None) => Ok(items),
        _ => Err(LispError::wrong_syntax(
            function,
            "expected a proper argument list",
        )),
    }
}

pub(crate) fn number(function: &'static str, v: &Value) -> Result<f64, LispError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(LispError::type_mismatch(function, "number", other)),
    }
}

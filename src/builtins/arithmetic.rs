//! Arithmetic built-ins: `+`, `-`, `*`, `/`.
//!
//! All four are variadic. `(+)` is 0 and `(*)` is 1; `-` with a single
//! argument negates and `/` with a single argument reciprocates. Division
//! follows IEEE-754, so dividing by zero yields an infinity rather than
//! an error.

use super::{args_vec, number};
use crate::env::Environment;
use crate::error::LispError;
use crate::value::{Function, Value};
use std::sync::Arc;

fn builtin_add(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut sum = 0.0;
    for arg in &args_vec("+", &args)? {
        sum += number("+", arg)?;
    }
    Ok(Value::Number(sum))
}

fn builtin_mul(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut product = 1.0;
    for arg in &args_vec("*", &args)? {
        product *= number("*", arg)?;
    }
    Ok(Value::Number(product))
}

fn builtin_sub(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let args = args_vec("-", &args)?;
    if args.is_empty() {
        return Err(LispError::NotEnoughArguments);
    }
    let first = number("-", &args[0])?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut result = first;
    for arg in &args[1..] {
        result -= number("-", arg)?;
    }
    Ok(Value::Number(result))
}

fn builtin_div(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let args = args_vec("/", &args)?;
    if args.is_empty() {
        return Err(LispError::NotEnoughArguments);
    }
    let first = number("/", &args[0])?;
    if args.len() == 1 {
        return Ok(Value::Number(1.0 / first));
    }
    // divide by the product of the remaining arguments
    let mut divisor = 1.0;
    for arg in &args[1..] {
        divisor *= number("/", arg)?;
    }
    Ok(Value::Number(first / divisor))
}

pub fn register(env: &Arc<Environment>) {
    env.set("+", Function::native(Value::EmptyList, builtin_add));
    env.set("-", Function::native(Value::EmptyList, builtin_sub));
    env.set("*", Function::native(Value::EmptyList, builtin_mul));
    env.set("/", Function::native(Value::EmptyList, builtin_div));
}

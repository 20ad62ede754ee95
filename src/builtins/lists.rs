//! List primitives: `car`, `cdr`, `cons`, `null?`, `atom?`, `symbol?`.

use super::args_vec;
use crate::env::Environment;
use crate::error::LispError;
use crate::value::{param_list, Function, Value};
use std::sync::Arc;

fn one(function: &'static str, args: Value) -> Result<Value, LispError> {
    let mut args = args_vec(function, &args)?;
    match args.len() {
        0 => Err(LispError::NotEnoughArguments),
        1 => Ok(args.remove(0)),
        _ => Err(LispError::TooManyArguments),
    }
}

fn builtin_car(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    match one("car", args)? {
        Value::Cons(cell) => Ok(cell.car.clone()),
        other => Err(LispError::type_mismatch("car", "pair", &other)),
    }
}

fn builtin_cdr(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    match one("cdr", args)? {
        Value::Cons(cell) => Ok(cell.cdr.clone()),
        other => Err(LispError::type_mismatch("cdr", "pair", &other)),
    }
}

fn builtin_cons(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut args = args_vec("cons", &args)?;
    if args.len() != 2 {
        return Err(if args.len() < 2 {
            LispError::NotEnoughArguments
        } else {
            LispError::TooManyArguments
        });
    }
    let cdr = args.remove(1);
    let car = args.remove(0);
    Ok(Value::cons(car, cdr))
}

fn builtin_null(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    Ok(Value::Bool(one("null?", args)?.is_null()))
}

fn builtin_atom(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    Ok(Value::Bool(!matches!(one("atom?", args)?, Value::Cons(_))))
}

fn builtin_symbol(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    Ok(Value::Bool(matches!(
        one("symbol?", args)?,
        Value::Symbol(_)
    )))
}

pub fn register(env: &Arc<Environment>) {
    env.set("car", Function::native(param_list(&["l"]), builtin_car));
    env.set("cdr", Function::native(param_list(&["l"]), builtin_cdr));
    env.set(
        "cons",
        Function::native(param_list(&["a", "b"]), builtin_cons),
    );
    env.set("null?", Function::native(param_list(&["v"]), builtin_null));
    env.set("atom?", Function::native(param_list(&["v"]), builtin_atom));
    env.set(
        "symbol?",
        Function::native(param_list(&["v"]), builtin_symbol),
    );
}

//! Reflection and application built-ins: `eval`, `apply`, `macroexpand`,
//! `gensym`, `defined?`, `version`.

use super::args_vec;
use crate::config::VERSION;
use crate::env::Environment;
use crate::error::LispError;
use crate::eval::{eval, expand, invoke};
use crate::quasiquote;
use crate::value::{param_list, param_list_dotted, Function, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// process-wide so generated names stay unique across scopes and flows
static SYM_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn builtin_eval(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("eval", &args)?;
    if items.len() != 1 {
        return Err(if items.is_empty() {
            LispError::NotEnoughArguments
        } else {
            LispError::TooManyArguments
        });
    }
    eval(&items[0], env)
}

/// `(apply fn a1 a2 ... list)` calls `fn` with `a1..` prepended to the
/// final list argument.
fn builtin_apply(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut items = args_vec("apply", &args)?;
    if items.is_empty() {
        return Err(LispError::NotEnoughArguments);
    }
    let head = items.remove(0);
    let func = match head {
        Value::Function(f) => f,
        other => {
            return Err(LispError::NotApplicable {
                form: other.to_string(),
                type_name: other.type_name(),
            });
        }
    };

    let chain = match items.pop() {
        None => Value::EmptyList,
        Some(last) => {
            let tail = match last {
                Value::Cons(_) => last,
                ref v if v.is_null() => Value::EmptyList,
                other => return Err(LispError::type_mismatch("apply", "list", &other)),
            };
            Value::dotted(items, tail)
        }
    };
    invoke(&func, env, chain)
}

/// Substitutes a quasiquoted value, or expands a macro call form one step
/// without evaluating the expansion. Anything else passes through.
fn builtin_macroexpand(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut items = args_vec("macroexpand", &args)?;
    if items.len() != 1 {
        return Err(if items.is_empty() {
            LispError::NotEnoughArguments
        } else {
            LispError::TooManyArguments
        });
    }
    let value = items.remove(0);
    match &value {
        Value::Quasiquoted(template) => quasiquote::substitute(template, env),
        Value::Cons(cell) => {
            if let Some(name) = cell.car.as_symbol() {
                if let Some(Value::Function(f)) = env.get(name) {
                    if f.is_macro {
                        return expand(&f, env, cell.cdr.clone());
                    }
                }
            }
            Ok(value)
        }
        _ => Ok(value),
    }
}

fn builtin_gensym(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("gensym", &args)?;
    let prefix = match items.first() {
        None => "_".to_string(),
        Some(Value::Str(s)) => s.clone(),
        Some(Value::Symbol(s)) => s.clone(),
        Some(other) => return Err(LispError::type_mismatch("gensym", "string", other)),
    };
    if items.len() > 1 {
        return Err(LispError::TooManyArguments);
    }
    let n = SYM_COUNTER.fetch_add(1, Ordering::Relaxed);
    Ok(Value::Symbol(format!("{}{}", prefix, n)))
}

fn builtin_defined(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("defined?", &args)?;
    match items.as_slice() {
        [Value::Symbol(name)] => Ok(Value::Bool(env.get(name).is_some())),
        [other] => Err(LispError::type_mismatch("defined?", "symbol", other)),
        [] => Err(LispError::NotEnoughArguments),
        _ => Err(LispError::TooManyArguments),
    }
}

fn builtin_version(_env: &Arc<Environment>, _args: Value) -> Result<Value, LispError> {
    Ok(Value::Str(VERSION.to_string()))
}

pub fn register(env: &Arc<Environment>) {
    env.set("eval", Function::native(param_list(&["code"]), builtin_eval));
    env.set(
        "apply",
        Function::native(param_list_dotted(&["fn", "arg"], "args"), builtin_apply),
    );
    env.set(
        "macroexpand",
        Function::native(param_list(&["code"]), builtin_macroexpand),
    );
    env.set("gensym", Function::native(Value::EmptyList, builtin_gensym));
    env.set(
        "defined?",
        Function::native(param_list(&["name"]), builtin_defined),
    );
    env.set(
        "version",
        Function::native(Value::EmptyList, builtin_version),
    );
}

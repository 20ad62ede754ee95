// ABOUTME: The evaluator: reduces a Value in an Environment to a Value

use crate::env::Environment;
use crate::error::LispError;
use crate::quasiquote;
use crate::value::{list_parts, Callable, ConsCell, Function, Value};
use std::sync::Arc;

/// Evaluates one form. Atoms are self-evaluating, symbols resolve through
/// the scope chain, quote wrappers are stripped or substituted, and cons
/// cells are applications.
pub fn eval(expr: &Value, env: &Arc<Environment>) -> Result<Value, LispError> {
    match expr {
        Value::Nil
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Str(_)
        | Value::Keyword(_)
        | Value::Function(_) => Ok(expr.clone()),
        Value::Symbol(name) => env
            .get(name)
            .ok_or_else(|| LispError::Unbound(name.clone())),
        Value::EmptyList => Err(LispError::EmptyApplication),
        Value::Quoted(inner) => Ok((**inner).clone()),
        Value::Quasiquoted(inner) => quasiquote::substitute(inner, env),
        Value::Unquoted(_) | Value::Spliced(_) => Err(LispError::UnquoteOutsideQuasi),
        Value::Cons(cell) => apply(cell, env),
    }
}

fn apply(cell: &Arc<ConsCell>, env: &Arc<Environment>) -> Result<Value, LispError> {
    let head = eval(&cell.car, env)?;
    let func = match head {
        Value::Function(f) => f,
        other => {
            return Err(LispError::NotApplicable {
                form: cell.car.to_string(),
                type_name: other.type_name(),
            });
        }
    };

    if func.is_macro {
        // macros see the raw argument forms
        invoke(&func, env, cell.cdr.clone())
    } else {
        let args = map_eval(&cell.cdr, env)?;
        invoke(&func, env, args)
    }
}

/// Evaluates every element of an argument chain, left to right.
fn map_eval(chain: &Value, env: &Arc<Environment>) -> Result<Value, LispError> {
    let (items, tail) = list_parts(chain);
    if tail.is_some() {
        return Err(LispError::wrong_syntax(
            "apply",
            "argument list must be a proper list",
        ));
    }
    let mut values = Vec::with_capacity(items.len());
    for item in &items {
        values.push(eval(item, env)?);
    }
    Ok(Value::list(values))
}

/// Calls a function with an already-assembled argument chain. For macros
/// the chain holds raw forms and the expansion is re-evaluated in the
/// caller's scope.
pub fn invoke(
    func: &Arc<Function>,
    caller: &Arc<Environment>,
    args: Value,
) -> Result<Value, LispError> {
    match &func.call {
        Callable::Native(native) => native(caller, args),
        Callable::Interpreted { .. } => {
            let result = expand(func, caller, args)?;
            if func.is_macro {
                eval(&result, caller)
            } else {
                Ok(result)
            }
        }
    }
}

/// Runs a function body in a child of its capture scope, without the final
/// macro re-evaluation. `macroexpand` uses this to show expansions.
pub fn expand(
    func: &Arc<Function>,
    caller: &Arc<Environment>,
    args: Value,
) -> Result<Value, LispError> {
    match &func.call {
        Callable::Native(native) => native(caller, args),
        Callable::Interpreted { body, env } => {
            let scope = env.sub();
            bind_params(&func.params, args, &scope)?;
            let mut result = Value::Nil;
            for form in body {
                result = eval(form, &scope)?;
            }
            Ok(result)
        }
    }
}

/// Binds an argument chain against a formal parameter spec: `()`/`#nil`
/// (no parameters), a bare symbol (variadic capture), a proper list of
/// symbols, or a dotted list whose tail symbol takes the remainder.
/// Repeated names rebind; the later occurrence wins.
pub fn bind_params(
    params: &Value,
    args: Value,
    scope: &Arc<Environment>,
) -> Result<(), LispError> {
    match params {
        Value::Nil | Value::EmptyList => {
            if args.is_null() {
                Ok(())
            } else {
                Err(LispError::TooManyArguments)
            }
        }
        Value::Symbol(name) => {
            scope.set(name.clone(), args);
            Ok(())
        }
        Value::Cons(_) => {
            let mut formal = params.clone();
            let mut rest = args;
            loop {
                match formal {
                    Value::Cons(cell) => {
                        let name = match &cell.car {
                            Value::Symbol(s) => s.clone(),
                            other => {
                                return Err(LispError::wrong_syntax(
                                    "lambda",
                                    format!("parameter must be a symbol, got {}", other),
                                ));
                            }
                        };
                        match rest {
                            Value::Cons(arg_cell) => {
                                scope.set(name, arg_cell.car.clone());
                                rest = arg_cell.cdr.clone();
                            }
                            _ => return Err(LispError::NotEnoughArguments),
                        }
                        formal = cell.cdr.clone();
                    }
                    Value::Nil | Value::EmptyList => {
                        return if rest.is_null() {
                            Ok(())
                        } else {
                            Err(LispError::TooManyArguments)
                        };
                    }
                    Value::Symbol(rest_name) => {
                        // dotted tail takes whatever is left, possibly ()
                        scope.set(rest_name, rest);
                        return Ok(());
                    }
                    other => {
                        return Err(LispError::wrong_syntax(
                            "lambda",
                            format!("bad parameter list tail: {}", other),
                        ));
                    }
                }
            }
        }
        other => Err(LispError::wrong_syntax(
            "lambda",
            format!("bad parameter list: {}", other),
        )),
    }
}

//! Core special forms, registered as native macros: `define`, `set!`,
//! `lambda`, `if`, `quote`, `quasiquote`, `unquote`, `unquote-splicing`,
//! and `defmacro`.
//!
//! Binding forms evaluate to `#nil` so the REPL stays quiet about them.

use super::args_vec;
use crate::env::Environment;
use crate::error::LispError;
use crate::eval::eval;
use crate::quasiquote;
use crate::value::{
    param_list, param_list_dotted, Callable, Function, Value,
};
use std::sync::Arc;

fn interpreted(is_macro: bool, params: Value, body: Vec<Value>, env: &Arc<Environment>) -> Value {
    Value::Function(Arc::new(Function {
        is_macro,
        params,
        call: Callable::Interpreted {
            body,
            env: env.clone(),
        },
    }))
}

/// `(define name value)`, `(define name)`, and the function shorthand
/// `(define (name params...) body...)` with dotted parameters permitted.
fn macro_define(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("define", &args)?;
    if items.is_empty() {
        return Err(LispError::wrong_syntax("define", "wrong syntax"));
    }
    match &items[0] {
        Value::Symbol(name) => match items.len() {
            1 => {
                env.set(name.clone(), Value::Nil);
            }
            2 => {
                let value = eval(&items[1], env)?;
                env.set(name.clone(), value);
            }
            _ => return Err(LispError::wrong_syntax("define", "wrong syntax")),
        },
        Value::Cons(header) => {
            let name = match &header.car {
                Value::Symbol(n) => n.clone(),
                other => {
                    return Err(LispError::wrong_syntax(
                        "define",
                        format!("function name must be a symbol, got {}", other),
                    ));
                }
            };
            let params = header.cdr.clone();
            let body = items[1..].to_vec();
            env.set(name, interpreted(false, params, body, env));
        }
        other => {
            return Err(LispError::wrong_syntax(
                "define",
                format!("cannot bind {}", other),
            ));
        }
    }
    Ok(Value::Nil)
}

/// `(set! name value)` rebinds in the scope that owns the binding.
fn macro_set(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("set!", &args)?;
    if items.len() != 2 {
        return Err(LispError::wrong_syntax("set!", "expected a name and a value"));
    }
    let name = match &items[0] {
        Value::Symbol(n) => n.clone(),
        other => {
            return Err(LispError::wrong_syntax(
                "set!",
                format!("name must be a symbol, got {}", other),
            ));
        }
    };
    let value = eval(&items[1], env)?;
    if env.update(&name, value) {
        Ok(Value::Nil)
    } else {
        Err(LispError::Unbound(name))
    }
}

/// `(lambda params body...)` closes over the defining scope.
fn macro_lambda(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("lambda", &args)?;
    if items.is_empty() {
        return Err(LispError::wrong_syntax("lambda", "expected a parameter list"));
    }
    let params = items[0].clone();
    let body = items[1..].to_vec();
    Ok(interpreted(false, params, body, env))
}

fn macro_quote(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut items = args_vec("quote", &args)?;
    if items.len() != 1 {
        return Err(LispError::wrong_syntax("quote", "expected 1 argument"));
    }
    Ok(items.remove(0))
}

fn macro_quasiquote(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("quasiquote", &args)?;
    if items.len() != 1 {
        return Err(LispError::wrong_syntax("quasiquote", "expected 1 argument"));
    }
    quasiquote::substitute(&items[0], env)
}

fn macro_unquote(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut items = args_vec("unquote", &args)?;
    if items.len() != 1 {
        return Err(LispError::wrong_syntax("unquote", "expected 1 argument"));
    }
    Ok(Value::Unquoted(Arc::new(items.remove(0))))
}

fn macro_unquote_splicing(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let mut items = args_vec("unquote-splicing", &args)?;
    if items.len() != 1 {
        return Err(LispError::wrong_syntax(
            "unquote-splicing",
            "expected 1 argument",
        ));
    }
    Ok(Value::Spliced(Arc::new(items.remove(0))))
}

/// `(if cond then)` / `(if cond then else)`. Anything past the else
/// branch is rejected.
fn macro_if(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("if", &args)?;
    if items.len() < 2 || items.len() > 3 {
        return Err(LispError::wrong_syntax("if", "wrong syntax"));
    }
    let cond = eval(&items[0], env)?;
    if cond.truthy() {
        eval(&items[1], env)
    } else if items.len() == 3 {
        eval(&items[2], env)
    } else {
        Ok(Value::Nil)
    }
}

/// `(defmacro name params body...)`
fn macro_defmacro(env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("defmacro", &args)?;
    if items.len() < 2 {
        return Err(LispError::wrong_syntax(
            "defmacro",
            "expected a name, parameters, and a body",
        ));
    }
    let name = match &items[0] {
        Value::Symbol(n) => n.clone(),
        other => {
            return Err(LispError::wrong_syntax(
                "defmacro",
                format!("name must be a symbol, got {}", other),
            ));
        }
    };
    let params = items[1].clone();
    let body = items[2..].to_vec();
    env.set(name, interpreted(true, params, body, env));
    Ok(Value::Nil)
}

pub fn register(env: &Arc<Environment>) {
    env.set(
        "define",
        Function::native_macro(param_list(&["name", "value"]), macro_define),
    );
    env.set(
        "set!",
        Function::native_macro(param_list(&["name", "value"]), macro_set),
    );
    env.set(
        "lambda",
        Function::native_macro(param_list(&["params", "code"]), macro_lambda),
    );
    env.set(
        "quote",
        Function::native_macro(param_list(&["list"]), macro_quote),
    );
    env.set(
        "quasiquote",
        Function::native_macro(param_list(&["template"]), macro_quasiquote),
    );
    env.set(
        "unquote",
        Function::native_macro(param_list(&["quasiquoted"]), macro_unquote),
    );
    env.set(
        "unquote-splicing",
        Function::native_macro(param_list(&["quasiquoted"]), macro_unquote_splicing),
    );
    env.set(
        "if",
        Function::native_macro(param_list_dotted(&["cond", "t"], "f"), macro_if),
    );
    env.set(
        "defmacro",
        Function::native_macro(param_list_dotted(&["name", "params"], "code"), macro_defmacro),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::reader::read_str;

    fn run(src: &str) -> Result<Value, LispError> {
        let env = Environment::global();
        builtins::register(&env);
        let mut last = Value::Nil;
        for form in read_str(src)? {
            last = eval(&form, &env)?;
        }
        Ok(last)
    }

    #[test]
    fn test_define_shapes() {
        assert_eq!(run("(define x 1) x").unwrap(), Value::Number(1.0));
        assert_eq!(run("(define x) x").unwrap(), Value::Nil);
        assert_eq!(
            run("(define (id x) x) (id 9)").unwrap(),
            Value::Number(9.0)
        );
        assert!(matches!(
            run("(define)"),
            Err(LispError::WrongSyntax { form: "define", .. })
        ));
        assert!(matches!(
            run("(define x 1 2)"),
            Err(LispError::WrongSyntax { form: "define", .. })
        ));
        assert!(matches!(
            run("(define 5 1)"),
            Err(LispError::WrongSyntax { form: "define", .. })
        ));
    }

    #[test]
    fn test_quote_arity() {
        assert!(matches!(
            run("(quote a b)"),
            Err(LispError::WrongSyntax { form: "quote", .. })
        ));
    }

    #[test]
    fn test_unquote_builtin_wraps() {
        // outside a quasiquote the wrapper is built but never unwrapped
        assert_eq!(
            run("(unquote x)").unwrap().to_string(),
            ",x"
        );
        assert_eq!(
            run("(unquote-splicing x)").unwrap().to_string(),
            ",@x"
        );
    }

    #[test]
    fn test_quasiquote_substitutes_wrappers_only() {
        // the reader's sigil wrappers are what substitution recognises; a
        // textual (unquote v) list passes through as data
        assert_eq!(
            run("(quasiquote (a (unquote v)))").unwrap().to_string(),
            "(a (unquote v))"
        );
        assert_eq!(run("(define v 5) `(a ,v)").unwrap().to_string(), "(a 5)");
    }

    #[test]
    fn test_defmacro_defines_macro() {
        let code = "
            (defmacro when2 (test body) `(if ,test ,body #nil))
            (when2 #t 42)";
        assert_eq!(run(code).unwrap(), Value::Number(42.0));
        assert_eq!(
            run("(defmacro when2 (test body) `(if ,test ,body #nil)) (when2 #f 42)").unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn test_defmacro_bad_header() {
        assert!(matches!(
            run("(defmacro 5 (x) x)"),
            Err(LispError::WrongSyntax { form: "defmacro", .. })
        ));
        assert!(matches!(
            run("(defmacro only-name)"),
            Err(LispError::WrongSyntax { form: "defmacro", .. })
        ));
    }
}

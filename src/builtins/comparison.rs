//! Comparison built-ins: `=`, `eq?`, `<`, `<=`, `>`, `>=`.
//!
//! All are chained: the relation must hold between every adjacent pair,
//! and zero or one argument is vacuously true. `=` and `eq?` share one
//! structural equality; the ordering relations require numbers.

use super::{args_vec, number};
use crate::env::Environment;
use crate::error::LispError;
use crate::value::{Function, Value};
use std::sync::Arc;

fn chained(
    function: &'static str,
    args: &Value,
    holds: fn(f64, f64) -> bool,
) -> Result<Value, LispError> {
    let args = args_vec(function, args)?;
    for pair in args.windows(2) {
        if !holds(number(function, &pair[0])?, number(function, &pair[1])?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn builtin_eq(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let args = args_vec("=", &args)?;
    for pair in args.windows(2) {
        if pair[0] != pair[1] {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn builtin_lt(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    chained("<", &args, |a, b| a < b)
}

fn builtin_le(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    chained("<=", &args, |a, b| a <= b)
}

fn builtin_gt(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    chained(">", &args, |a, b| a > b)
}

fn builtin_ge(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    chained(">=", &args, |a, b| a >= b)
}

pub fn register(env: &Arc<Environment>) {
    env.set("=", Function::native(Value::EmptyList, builtin_eq));
    env.set("eq?", Function::native(Value::EmptyList, builtin_eq));
    env.set("<", Function::native(Value::EmptyList, builtin_lt));
    env.set("<=", Function::native(Value::EmptyList, builtin_le));
    env.set(">", Function::native(Value::EmptyList, builtin_gt));
    env.set(">=", Function::native(Value::EmptyList, builtin_ge));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::eval::eval;
    use crate::reader::read_str;

    fn truth(src: &str) -> bool {
        let env = Environment::global();
        builtins::register(&env);
        let mut last = Value::Nil;
        for form in read_str(src).unwrap() {
            last = eval(&form, &env).unwrap();
        }
        matches!(last, Value::Bool(true))
    }

    #[test]
    fn test_numeric_equality() {
        assert!(truth("(= 1 1 1)"));
        assert!(!truth("(= 1 2)"));
        assert!(truth("(= 5)"));
        assert!(truth("(=)"));
    }

    #[test]
    fn test_eq_is_structural() {
        assert!(truth("(eq? '(1 2) '(1 2))"));
        assert!(truth("(eq? \"a\" \"a\")"));
        assert!(truth("(eq? 'x 'x)"));
        assert!(!truth("(eq? '(1) '(2))"));
        assert!(!truth("(eq? 1 \"1\")"));
        // #nil and () stay distinct under eq? even though both are null?
        assert!(!truth("(eq? #nil '())"));
    }

    #[test]
    fn test_chained_ordering() {
        assert!(truth("(< 1 2 3)"));
        assert!(!truth("(< 1 3 2)"));
        assert!(truth("(<= 1 1 2)"));
        assert!(truth("(> 3 2 1)"));
        assert!(truth("(>= 3 3 1)"));
        assert!(!truth("(> 1 1)"));
    }

    #[test]
    fn test_ordering_requires_numbers() {
        let env = Environment::global();
        builtins::register(&env);
        let form = read_str("(< 1 \"a\")").unwrap().remove(0);
        assert!(matches!(
            eval(&form, &env),
            Err(LispError::TypeMismatch { function: "<", .. })
        ));
    }
}

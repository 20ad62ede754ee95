//! String built-ins: `strlen` and `char`. Both count code points, not
//! bytes.

use super::args_vec;
use crate::env::Environment;
use crate::error::LispError;
use crate::value::{param_list, Function, Value};
use std::sync::Arc;

fn builtin_strlen(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("strlen", &args)?;
    match items.as_slice() {
        [Value::Str(s)] => Ok(Value::Number(s.chars().count() as f64)),
        [other] => Err(LispError::type_mismatch("strlen", "string", other)),
        [] => Err(LispError::NotEnoughArguments),
        _ => Err(LispError::TooManyArguments),
    }
}

/// `(char s i)` — the i-th character of `s` as a one-character string.
fn builtin_char(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    let items = args_vec("char", &args)?;
    if items.len() != 2 {
        return Err(if items.len() < 2 {
            LispError::NotEnoughArguments
        } else {
            LispError::TooManyArguments
        });
    }
    let s = match &items[0] {
        Value::Str(s) => s,
        other => return Err(LispError::type_mismatch("char", "string", other)),
    };
    let index = match &items[1] {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => *n as usize,
        other => return Err(LispError::type_mismatch("char", "number", other)),
    };
    match s.chars().nth(index) {
        Some(c) => Ok(Value::Str(c.to_string())),
        None => Err(LispError::runtime(
            "char",
            format!("index {} out of range", index),
        )),
    }
}

pub fn register(env: &Arc<Environment>) {
    env.set(
        "strlen",
        Function::native(param_list(&["s"]), builtin_strlen),
    );
    env.set(
        "char",
        Function::native(param_list(&["s", "i"]), builtin_char),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::eval::eval;
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
    fn test_strlen_counts_code_points() {
        assert_eq!(run("(strlen \"hello\")").unwrap(), Value::Number(5.0));
        assert_eq!(run("(strlen \"\")").unwrap(), Value::Number(0.0));
        assert_eq!(run("(strlen \"a\\nb\")").unwrap(), Value::Number(3.0));
        assert_eq!(run("(strlen \"héllo\")").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_char_indexes_code_points() {
        assert_eq!(
            run("(char \"hello\" 1)").unwrap(),
            Value::Str("e".to_string())
        );
        assert_eq!(
            run("(char \"héllo\" 1)").unwrap(),
            Value::Str("é".to_string())
        );
    }

    #[test]
    fn test_char_out_of_range() {
        assert!(matches!(
            run("(char \"ab\" 5)"),
            Err(LispError::Runtime {
                function: "char",
                ..
            })
        ));
    }

    #[test]
    fn test_type_checks() {
        assert!(matches!(
            run("(strlen 5)"),
            Err(LispError::TypeMismatch { .. })
        ));
        assert!(matches!(
            run("(char \"ab\" \"x\")"),
            Err(LispError::TypeMismatch { .. })
        ));
    }
}

//! Output built-ins: `display`, `println`, `debug`.
//!
//! Strings print their contents without quotes; every other value prints
//! its reader syntax. All three evaluate to `#nil`.

use super::args_vec;
use crate::env::Environment;
use crate::error::LispError;
use crate::value::{debug_string, param_list, Function, Value};
use std::io::Write;
use std::sync::Arc;

fn display_form(v: &Value) -> String {
    match v {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

fn joined(function: &'static str, args: &Value) -> Result<String, LispError> {
    Ok(args_vec(function, args)?
        .iter()
        .map(display_form)
        .collect::<Vec<_>>()
        .join(" "))
}

fn builtin_display(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    print!("{}", joined("display", &args)?);
    let _ = std::io::stdout().flush();
    Ok(Value::Nil)
}

fn builtin_println(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    println!("{}", joined("println", &args)?);
    Ok(Value::Nil)
}

fn builtin_debug(_env: &Arc<Environment>, args: Value) -> Result<Value, LispError> {
    for arg in &args_vec("debug", &args)? {
        println!("{}", debug_string(arg));
    }
    Ok(Value::Nil)
}

pub fn register(env: &Arc<Environment>) {
    env.set(
        "display",
        Function::native(param_list(&["obj"]), builtin_display),
    );
    env.set(
        "println",
        Function::native(param_list(&["str"]), builtin_println),
    );
    env.set("debug", Function::native(param_list(&["obj"]), builtin_debug));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_form_strips_string_quotes() {
        assert_eq!(display_form(&Value::Str("hi".to_string())), "hi");
        assert_eq!(display_form(&Value::Number(3.0)), "3");
        assert_eq!(
            display_form(&Value::list(vec![Value::Number(1.0)])),
            "(1)"
        );
    }

    #[test]
    fn test_println_returns_nil() {
        let env = Environment::global();
        let out = builtin_println(
            &env,
            Value::list(vec![Value::Str("Hello!".to_string())]),
        )
        .unwrap();
        assert_eq!(out, Value::Nil);
    }
}

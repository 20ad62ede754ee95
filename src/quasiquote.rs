// ABOUTME: Quasiquote substitution: realises unquote and unquote-splicing in templates

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::eval;
use crate::value::{list_parts, Value};
use std::sync::Arc;

/// Realises a quasiquoted template. Unquoted payloads evaluate in `env`,
/// spliced payloads flatten into the surrounding chain, and everything
/// else copies verbatim. Nested quasiquote wrappers are opaque: their
/// inner templates are left untouched, which is what makes an unquote
/// legal only at the depth it was written.
pub fn substitute(template: &Value, env: &Arc<Environment>) -> Result<Value, LispError> {
    match template {
        Value::Cons(_) => substitute_chain(template, env),
        Value::Unquoted(payload) | Value::Spliced(payload) => eval(payload, env),
        _ => Ok(template.clone()),
    }
}

fn substitute_chain(chain: &Value, env: &Arc<Environment>) -> Result<Value, LispError> {
    let (items, dotted) = list_parts(chain);
    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    // set when a splice produced a non-list (or improper) tail; nothing
    // may follow it
    let mut forced_tail: Option<Value> = None;

    for item in &items {
        if forced_tail.is_some() {
            return Err(LispError::SpliceShape);
        }
        match item {
            Value::Spliced(payload) => {
                let spliced = eval(payload, env)?;
                if spliced.is_null() {
                    continue;
                }
                let (elements, tail) = list_parts(&spliced);
                out.extend(elements);
                forced_tail = tail;
            }
            Value::Unquoted(payload) => out.push(eval(payload, env)?),
            other => out.push(substitute(other, env)?),
        }
    }

    let tail = match (forced_tail, dotted) {
        (Some(_), Some(_)) => return Err(LispError::SpliceShape),
        (Some(t), None) => t,
        (None, Some(d)) => substitute(&d, env)?,
        (None, None) => Value::EmptyList,
    };
    Ok(Value::dotted(out, tail))
}

// ABOUTME: Interpreter shell: global scope bootstrap and source runners

use crate::builtins;
use crate::env::Environment;
use crate::error::LispError;
use crate::eval::eval;
use crate::reader::Reader;
use crate::source::{CharSource, StrSource};
use crate::value::Value;
use std::path::Path;
use std::sync::Arc;

/// Bundled library modules, evaluated into the global scope in this order.
const LIBRARY: &[(&str, &str)] = &[("core", include_str!("../lib/core.scm"))];

/// Owns the global environment. Every runner evaluates top-level forms in
/// order and stops at the first error, which the caller decides how to
/// surface.
pub struct Interpreter {
    global: Arc<Environment>,
}

impl Interpreter {
    /// A global scope with all built-ins and the bundled library loaded.
    /// A library load failure aborts construction.
    pub fn new() -> Result<Self, LispError> {
        Self::with_library(true)
    }

    pub fn with_library(load_library: bool) -> Result<Self, LispError> {
        let global = Environment::global();
        builtins::register(&global);
        let interp = Interpreter { global };
        if load_library {
            for (name, code) in LIBRARY {
                interp
                    .eval_str(code)
                    .map_err(|e| LispError::runtime("library", format!("{}: {}", name, e)))?;
            }
        }
        Ok(interp)
    }

    pub fn global(&self) -> &Arc<Environment> {
        &self.global
    }

    /// Evaluates every form in `src`; the last result is returned and an
    /// empty source yields `#nil`.
    pub fn eval_str(&self, src: &str) -> Result<Value, LispError> {
        self.run_source(StrSource::new(src))
    }

    pub fn run_source<S: CharSource>(&self, src: S) -> Result<Value, LispError> {
        let mut reader = Reader::new(src);
        let mut last = Value::Nil;
        while let Some(form) = reader.read_form()? {
            last = eval(&form, &self.global)?;
        }
        Ok(last)
    }

    pub fn run_file(&self, path: &Path) -> Result<Value, LispError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LispError::Io(format!("{}: {}", path.display(), e)))?;
        self.eval_str(&contents)
    }
}

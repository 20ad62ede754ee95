// ABOUTME: Version, banner, and REPL constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WELCOME_MESSAGE: &str = "schemer — a Scheme-flavored Lisp";
pub const WELCOME_HINT: &str = "Results print as $N = VALUE; Ctrl-D exits.";

pub const PROMPT: &str = "> ";
pub const HISTORY_FILE: &str = ".schemer_history";

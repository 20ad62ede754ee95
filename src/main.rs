// ABOUTME: CLI entry point: batch file runner, interactive and piped REPL

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use schemer::config::{HISTORY_FILE, PROMPT, VERSION, WELCOME_HINT, WELCOME_MESSAGE};
use schemer::eval::eval;
use schemer::highlighter::LispHelper;
use schemer::interp::Interpreter;
use schemer::reader::Reader;
use schemer::source::{ChannelSource, StrSource};
use schemer::value::Value;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// A tree-walking interpreter for a Scheme-flavored Lisp
#[derive(Parser, Debug)]
#[command(name = "schemer")]
#[command(version = VERSION)]
#[command(about = "A Scheme-flavored Lisp interpreter")]
struct CliArgs {
    /// Script files to evaluate in order; starts the REPL when omitted
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Skip loading the bundled library
    #[arg(long = "no-library")]
    no_library: bool,
}

fn main() {
    let args = CliArgs::parse();

    let interp = match Interpreter::with_library(!args.no_library) {
        Ok(interp) => interp,
        Err(e) => {
            eprintln!("error while loading the library: {}", e);
            std::process::exit(1);
        }
    };

    // batch mode: evaluate each file in order, abort on the first failure
    if !args.files.is_empty() {
        for file in &args.files {
            if let Err(e) = interp.run_file(file) {
                eprintln!("fatal error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let result = if std::io::stdin().is_terminal() {
        interactive_repl(&interp)
    } else {
        piped_repl(&interp)
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Prints `$N = VALUE` for non-nil results; N only advances for them.
fn report(value: Value, counter: &mut usize) {
    if !matches!(value, Value::Nil) {
        *counter += 1;
        println!("${} = {}", counter, value);
    }
}

/// Evaluates every form of one editor submission. An error ends the
/// submission but not the session.
fn eval_and_report(interp: &Interpreter, input: &str, counter: &mut usize) {
    let mut reader = Reader::new(StrSource::new(input));
    loop {
        match reader.read_form() {
            Ok(None) => break,
            Ok(Some(form)) => match eval(&form, interp.global()) {
                Ok(value) => report(value, counter),
                Err(e) => {
                    println!("fatal error: {}", e);
                    break;
                }
            },
            Err(e) => {
                println!("fatal error: {}", e);
                break;
            }
        }
    }
}

/// Sequential REPL on a terminal: read one submission, evaluate, print.
fn interactive_repl(interp: &Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_HINT);

    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<LispHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(LispHelper::new()));
    let _ = rl.load_history(HISTORY_FILE);

    let mut counter = 0usize;
    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                eval_and_report(interp, &line, &mut counter);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("fatal error: {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

/// Producer/consumer REPL for piped input: a feeder thread delivers code
/// points into a channel, evaluation pulls complete forms out of it.
/// Closing stdin drains the reader at the next form boundary.
fn piped_repl(interp: &Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();

    let feeder = thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for c in line.chars() {
                if tx.send(c).is_err() {
                    return;
                }
            }
            if tx.send('\n').is_err() {
                return;
            }
        }
        // dropping tx delivers the end-of-input sentinel
    });

    let mut reader = Reader::new(ChannelSource::new(rx));
    let mut counter = 0usize;
    prompt();
    loop {
        match reader.read_form() {
            Ok(None) => break,
            Ok(Some(form)) => {
                match eval(&form, interp.global()) {
                    Ok(value) => report(value, &mut counter),
                    Err(e) => println!("fatal error: {}", e),
                }
                prompt();
            }
            Err(e) => {
                println!("fatal error: {}", e);
                prompt();
            }
        }
    }
    println!();

    let _ = feeder.join();
    Ok(())
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}

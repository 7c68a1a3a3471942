use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

use imp::{evaluate, parse_program, tokenize_file, Environment, ParserState, Token, Tokenizer};

/// Runs programs written in imp, a small imperative language.
#[derive(Parser, Debug)]
#[command(name = "imp", version)]
struct Args {
    /// Program to run. Starts an interactive session when omitted.
    file: Option<PathBuf>,

    /// Print the parsed program before evaluating it.
    #[arg(long)]
    ast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let outcome = match args.file {
        Some(ref path) => run_script(path, args.ast).map_err(|e| e.to_string()),
        None => run_repl(args.ast).map_err(|e| format!("Error: {e}")),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(path: &Path, show_ast: bool) -> Result<(), imp::Error> {
    let tokens = tokenize_file(path)?;
    let program = parse_program(&tokens)?;
    if show_ast {
        println!("Parsed result:\n\n{program:#?}\n");
    }
    let mut env = Environment::new();
    evaluate(&program, &mut env)?;
    println!("Final variable values:");
    print_bindings(&env);
    Ok(())
}

fn run_repl(show_ast: bool) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut env = Environment::new();
    let mut tokenizer = Tokenizer::new();
    loop {
        let prompt = if tokenizer.is_empty() { ">> " } else { ".. " };
        match rl.readline(prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match tokenizer.tokenize(&format!("{line}\n")) {
                    ParserState::ContinuationNeeded => continue,
                    ParserState::Error(e) => {
                        eprintln!("{e}");
                        tokenizer = Tokenizer::new();
                    }
                    ParserState::Ok => {
                        let tokens = std::mem::take(&mut tokenizer).finalize();
                        if !tokens.is_empty() {
                            execute(&tokens, &mut env, show_ast);
                        }
                    }
                }
            }
            // CTRL-C drops a half-typed block, or leaves when there is none.
            Err(ReadlineError::Interrupted) if !tokenizer.is_empty() => {
                tokenizer = Tokenizer::new();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn execute(tokens: &[Token], env: &mut Environment, show_ast: bool) {
    let outcome = parse_program(tokens).and_then(|program| {
        if show_ast {
            println!("{program:?}");
        }
        Ok(evaluate(&program, env)?)
    });
    match outcome {
        Ok(()) => print_bindings(env),
        Err(e) => eprintln!("{e}"),
    }
}

fn print_bindings(env: &Environment) {
    for (name, value) in env.bindings() {
        println!("{name}: {value}");
    }
}

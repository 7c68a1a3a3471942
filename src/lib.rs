pub mod parser;
pub use parser::tokenizer::{tokenize_file, tokenize_string, ParserState, Token, TokenType, Tokenizer};
pub use parser::{parse, LexError, ParseResult, Statement};

mod interpreter;
pub use interpreter::{evaluate, evaluate_arithmetic, evaluate_boolean, Environment, EvalError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Parse error!")]
    Syntax,
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses a token sequence into a program, or `Error::Syntax`.
pub fn parse_program(tokens: &[Token]) -> Result<Statement, Error> {
    parse(tokens).into_value().ok_or(Error::Syntax)
}

/// Tokenizes, parses and evaluates `source` against `env`.
pub fn run(source: &str, env: &mut Environment) -> Result<(), Error> {
    let tokens = tokenize_string(source)?;
    let program = parse_program(&tokens)?;
    evaluate(&program, env)?;
    Ok(())
}

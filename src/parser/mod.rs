mod ast;
pub mod combinators;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use combinators::{ParseResult, ParserInput};
pub use error::LexError;
pub use grammar::{arithmetic_expression, boolean_expression, parse, program, statement_list};
pub use locations::Location;
pub use tokenizer::{tokenize_file, tokenize_string, ParserState, Token, TokenType, Tokenizer};

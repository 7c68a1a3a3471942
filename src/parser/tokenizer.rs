use super::error::LexError;
use super::locations::Location;
use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

#[derive(Derivative)]
#[derivative(Clone, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    pub(crate) location: Location,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, typ: TokenType) -> Self {
        Self::at(lexeme, typ, Location::default())
    }
    pub fn at(lexeme: impl Into<String>, typ: TokenType, location: Location) -> Self {
        Self {
            typ,
            lexeme: lexeme.into(),
            location,
        }
    }
    pub fn typ(&self) -> TokenType {
        self.typ
    }
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
    pub fn location(&self) -> Location {
        self.location
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    RESERVED,
    INT,
    ID,
}

macro_rules! anchored {
    ($t:expr) => {
        concatcp!("^(?:", $t, ")")
    };
}

macro_rules! word {
    ($t:expr) => {
        anchored!(concatcp!(r"\b", $t, r"\b"))
    };
}

const S_WHITESPACE: &str = r"[ \n\t]+";
const S_COMMENT: &str = r"#[^\n]*";
const S_INT: &str = r"[0-9]+";
const S_ID: &str = r"[A-Za-z][A-Za-z0-9_]*";

use TokenType::{ID, INT, RESERVED};

// Order matters: the first matching rule wins, and S_ID would swallow every keyword.
const RULES: [(&str, Option<TokenType>); 29] = [
    (anchored!(S_WHITESPACE), None),
    (anchored!(S_COMMENT), None),
    (anchored!(":="), Some(RESERVED)),
    (anchored!(r"\("), Some(RESERVED)),
    (anchored!(r"\)"), Some(RESERVED)),
    (anchored!(";"), Some(RESERVED)),
    (anchored!(r"\+"), Some(RESERVED)),
    (anchored!("-"), Some(RESERVED)),
    (anchored!(r"\*"), Some(RESERVED)),
    (anchored!("/"), Some(RESERVED)),
    (anchored!("<="), Some(RESERVED)),
    (anchored!("<"), Some(RESERVED)),
    (anchored!(">="), Some(RESERVED)),
    (anchored!(">"), Some(RESERVED)),
    (anchored!("="), Some(RESERVED)),
    (anchored!("!="), Some(RESERVED)),
    (word!("and"), Some(RESERVED)),
    (word!("or"), Some(RESERVED)),
    (word!("not"), Some(RESERVED)),
    (word!("repeat"), Some(RESERVED)),
    (word!("times"), Some(RESERVED)),
    (word!("if"), Some(RESERVED)),
    (word!("then"), Some(RESERVED)),
    (word!("else"), Some(RESERVED)),
    (word!("while"), Some(RESERVED)),
    (word!("do"), Some(RESERVED)),
    (word!("end"), Some(RESERVED)),
    (anchored!(S_INT), Some(INT)),
    (anchored!(S_ID), Some(ID)),
];

static RULE_TABLE: Lazy<Vec<(Regex, Option<TokenType>)>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|(pattern, typ)| (Regex::new(pattern).expect("Error compiling regex."), *typ))
        .collect()
});

const BLOCK_OPENERS: [&str; 3] = ["if", "while", "repeat"];

#[derive(Debug)]
pub enum ParserState {
    Ok,
    ContinuationNeeded,
    Error(LexError),
}

/// Incremental scanner. Tokens accumulate across `tokenize` calls until
/// `finalize`, so an interactive session can feed one line at a time.
#[derive(Debug, Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    location: Location,
    paren_lvl: isize,
    block_lvl: isize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn tokenize(&mut self, input: &str) -> ParserState {
        if let Err(e) = self.scan(input) {
            return ParserState::Error(e);
        }
        if self.paren_lvl > 0 || self.block_lvl > 0 {
            return ParserState::ContinuationNeeded;
        }
        ParserState::Ok
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn finalize(self) -> Vec<Token> {
        self.tokens
    }

    fn scan(&mut self, input: &str) -> Result<(), LexError> {
        let mut start = 0;
        while start < input.len() {
            let rest = &input[start..];
            let matched = RULE_TABLE
                .iter()
                .find_map(|(regex, typ)| regex.find(rest).map(|m| (m.end(), *typ)));
            let Some((end, typ)) = matched.filter(|(end, _)| *end > 0) else {
                let character = rest.chars().next().unwrap_or_default();
                return Err(LexError::IllegalCharacter {
                    character,
                    location: self.location,
                });
            };
            let lexeme = &rest[..end];
            if let Some(typ) = typ {
                self.push(typ, lexeme)?;
            }
            self.location = self.location.advance(lexeme);
            start += end;
        }
        Ok(())
    }

    fn push(&mut self, typ: TokenType, lexeme: &str) -> Result<(), LexError> {
        match typ {
            TokenType::INT if lexeme.parse::<i64>().is_err() => {
                return Err(LexError::InvalidIntegerLiteral {
                    literal: lexeme.to_string(),
                    location: self.location,
                });
            }
            TokenType::RESERVED => match lexeme {
                "(" => self.paren_lvl += 1,
                ")" => self.paren_lvl -= 1,
                "end" => self.block_lvl -= 1,
                kw if BLOCK_OPENERS.contains(&kw) => self.block_lvl += 1,
                _ => {}
            },
            _ => {}
        }
        self.tokens.push(Token::at(lexeme, typ, self.location));
        Ok(())
    }
}

pub fn tokenize_string(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new();
    match tokenizer.tokenize(input) {
        ParserState::Error(e) => Err(e),
        ParserState::Ok | ParserState::ContinuationNeeded => Ok(tokenizer.finalize()),
    }
}

pub fn tokenize_file<P>(path: P) -> Result<Vec<Token>, crate::Error>
where
    P: AsRef<Path>,
{
    let source = std::fs::read_to_string(&path).map_err(|source| crate::Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    Ok(tokenize_string(&source)?)
}

//! Grammar-agnostic parser combinators over a token slice.
//!
//! A parser is anything implementing [`Parser`]: plain closures of type
//! `Fn(ParserInput) -> ParseResult<T>`, the [`BoxedParser`] wrapper used to
//! erase their types, and the memoizing [`Lazy`] reference used for recursive
//! rules. Failure is always local: a parser that does not match returns
//! [`ParseResult::Err`] and the caller is free to try something else at the
//! same input.

use derivative::Derivative;
use once_cell::unsync::OnceCell;

use super::tokenizer::{Token, TokenType};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<'a, Output> {
    Ok((Output, ParserInput<'a>)),
    Err,
}

/// A cursor into an immutable token sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserInput<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> ParserInput<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::at(tokens, 0)
    }
    pub fn at(tokens: &'a [Token], position: usize) -> Self {
        Self { tokens, position }
    }
    pub fn position(&self) -> usize {
        self.position
    }
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }
    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
    fn advance(self) -> Self {
        Self {
            tokens: self.tokens,
            position: self.position + 1,
        }
    }
}

impl<'a, T> ParseResult<'a, T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok((value, _)) => Some(value),
            Self::Err => None,
        }
    }
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Ok((_, rest)) => Some(rest.position()),
            Self::Err => None,
        }
    }
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok((value, _)) => Some(value),
            Self::Err => None,
        }
    }
    pub(super) fn or_else<O>(self, op: O) -> Self
    where
        O: FnOnce() -> Self,
    {
        match self {
            Self::Ok(inner) => Self::Ok(inner),
            Self::Err => op(),
        }
    }
    pub(super) fn map<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> (U, ParserInput<'a>),
    {
        match self {
            Self::Ok(inner) => ParseResult::Ok(op(inner)),
            Self::Err => ParseResult::Err,
        }
    }
    pub(super) fn and_then<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> ParseResult<'a, U>,
    {
        match self {
            Self::Ok(inner) => op(inner),
            Self::Err => ParseResult::Err,
        }
    }
}

/// The combining function carried by a separator parser in [`fold`].
pub type Combine<'a, T> = Box<dyn Fn(T, T) -> T + 'a>;

pub trait Parser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output>;

    fn parse_tokens(&self, tokens: &'a [Token]) -> ParseResult<'a, Output> {
        self.parse(ParserInput::new(tokens))
    }
    fn map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> MappedOutput + 'a,
    {
        BoxedParser::new(map(self, map_fn))
    }
    fn pred<F>(self, predicate: F) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
        F: Fn(&Output) -> bool + 'a,
    {
        BoxedParser::new(pred(self, predicate))
    }
    fn discard(self) -> BoxedParser<'a, ()>
    where
        Self: Sized + 'a,
        Output: 'a,
    {
        BoxedParser::new(map(self, |_| ()))
    }
    fn or(self, parser: impl Parser<'a, Output> + 'a) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
    {
        BoxedParser::new(either(self, parser))
    }
    fn then<R>(self, parser: impl Parser<'a, R> + 'a) -> BoxedParser<'a, (Output, R)>
    where
        Self: Sized + 'a,
        Output: 'a,
        R: 'a,
    {
        BoxedParser::new(pair(self, parser))
    }
    fn fold<F>(self, separator: impl Parser<'a, F> + 'a) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
        F: Fn(Output, Output) -> Output + 'a,
    {
        BoxedParser::new(fold(self, separator))
    }
}

impl<'a, F, Output> Parser<'a, Output> for F
where
    F: Fn(ParserInput<'a>) -> ParseResult<'a, Output>,
{
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self(input)
    }
}

pub struct BoxedParser<'a, Output> {
    parser: Box<dyn Parser<'a, Output> + 'a>,
}

impl<'a, Output> BoxedParser<'a, Output> {
    pub fn new(parser: impl Parser<'a, Output> + 'a) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl<'a, Output> Parser<'a, Output> for BoxedParser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.parse(input)
    }
}

impl<'a, Output> std::fmt::Debug for BoxedParser<'a, Output> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxedParser")
    }
}

/// Matches a token with exactly this lexeme and type, yielding the lexeme.
pub fn reserved(
    expected_lexeme: &str,
    expected_type: TokenType,
) -> impl Fn(ParserInput) -> ParseResult<String> {
    let expected_lexeme = expected_lexeme.to_string();
    move |input| match input.current() {
        Some(token) if token.typ == expected_type && token.lexeme == expected_lexeme => {
            ParseResult::Ok((token.lexeme.clone(), input.advance()))
        }
        _ => ParseResult::Err,
    }
}

/// Matches any token of the given type, yielding its lexeme.
pub fn tag(expected_type: TokenType) -> impl Fn(ParserInput) -> ParseResult<String> {
    move |input| match input.current() {
        Some(token) if token.typ == expected_type => {
            ParseResult::Ok((token.lexeme.clone(), input.advance()))
        }
        _ => ParseResult::Err,
    }
}

pub fn pair<'a, R1, R2>(
    parser1: impl Parser<'a, R1>,
    parser2: impl Parser<'a, R2>,
) -> impl Parser<'a, (R1, R2)> {
    move |input| {
        parser1.parse(input).and_then(|(result1, next_input)| {
            parser2
                .parse(next_input)
                .map(|(result2, rest)| ((result1, result2), rest))
        })
    }
}

/// Ordered choice: `parser2` is only tried, at the original input, when
/// `parser1` fails.
pub fn either<'a, R>(
    parser1: impl Parser<'a, R>,
    parser2: impl Parser<'a, R>,
) -> impl Parser<'a, R> {
    move |input| parser1.parse(input).or_else(|| parser2.parse(input))
}

pub fn map<'a, F, A, B>(
    parser: impl Parser<'a, A>,
    map_fn: F,
) -> impl Fn(ParserInput<'a>) -> ParseResult<'a, B>
where
    F: Fn(A) -> B,
{
    move |input| {
        parser
            .parse(input)
            .map(|(result, rest)| (map_fn(result), rest))
    }
}

/// Like [`map`], but `map_fn` may reject the value, which fails the parse.
pub fn try_map<'a, F, A, B>(parser: impl Parser<'a, A>, map_fn: F) -> impl Parser<'a, B>
where
    F: Fn(A) -> Option<B>,
{
    move |input| {
        parser
            .parse(input)
            .and_then(|(result, rest)| match map_fn(result) {
                Some(mapped) => ParseResult::Ok((mapped, rest)),
                None => ParseResult::Err,
            })
    }
}

pub fn left<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, A> {
    map(pair(left_parser, right_parser), |(left, _right)| left)
}

pub fn right<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, B> {
    map(pair(left_parser, right_parser), |(_left, right)| right)
}

pub fn pred<'a, A, F>(parser: impl Parser<'a, A>, predicate: F) -> impl Parser<'a, A>
where
    F: Fn(&A) -> bool,
{
    move |input| {
        if let ParseResult::Ok((result, rest)) = parser.parse(input) {
            if predicate(&result) {
                return ParseResult::Ok((result, rest));
            }
        }
        ParseResult::Err
    }
}

/// Never fails: yields `None` at the original input when `parser` does not match.
pub fn maybe<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Option<R>> {
    move |input| match parser.parse(input) {
        ParseResult::Ok((value, rest)) => ParseResult::Ok((Some(value), rest)),
        ParseResult::Err => ParseResult::Ok((None, input)),
    }
}

pub fn zero_or_more<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Vec<R>> {
    move |input| {
        let mut result = Vec::new();
        let mut tmp_input = input;
        while let ParseResult::Ok((next, rest)) = parser.parse(tmp_input) {
            tmp_input = rest;
            result.push(next);
        }
        ParseResult::Ok((result, tmp_input))
    }
}

pub fn one_or_more<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Vec<R>> {
    move |input| {
        let mut result = Vec::new();
        let mut tmp_input;
        if let ParseResult::Ok((first, rest)) = parser.parse(input) {
            tmp_input = rest;
            result.push(first);
        } else {
            return ParseResult::Err;
        }
        while let ParseResult::Ok((next, rest)) = parser.parse(tmp_input) {
            tmp_input = rest;
            result.push(next);
        }
        ParseResult::Ok((result, tmp_input))
    }
}

pub fn sep_by<'a, R, S>(
    parser: impl Parser<'a, R>,
    separator: impl Parser<'a, S>,
) -> impl Parser<'a, Vec<R>> {
    move |input| {
        if let ParseResult::Ok((first, rest)) = parser.parse(input) {
            let mut result = vec![first];
            let mut tmp_input = rest;
            while let ParseResult::Ok((next, rest)) = separator
                .parse(tmp_input)
                .and_then(|(_, s)| parser.parse(s))
            {
                tmp_input = rest;
                result.push(next)
            }
            return ParseResult::Ok((result, tmp_input));
        }
        ParseResult::Err
    }
}

/// Left-associative fold: `operand (separator operand)*`, where every
/// separator yields the function combining the accumulator with the next
/// operand. Stops before the first incomplete `(separator, operand)` pair.
pub fn fold<'a, R, F>(
    operand: impl Parser<'a, R>,
    separator: impl Parser<'a, F>,
) -> impl Parser<'a, R>
where
    F: Fn(R, R) -> R,
{
    move |input| {
        operand.parse(input).and_then(|(first, rest)| {
            let mut accumulator = first;
            let mut tmp_input = rest;
            while let ParseResult::Ok(((combine, next), rest)) =
                separator.parse(tmp_input).and_then(|(combine, s)| {
                    operand
                        .parse(s)
                        .map(|(next, rest)| ((combine, next), rest))
                })
            {
                accumulator = combine(accumulator, next);
                tmp_input = rest;
            }
            ParseResult::Ok((accumulator, tmp_input))
        })
    }
}

/// Succeeds only when `parser` consumes the whole token sequence.
pub fn phrase<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, R> {
    move |input| match parser.parse(input) {
        ParseResult::Ok((result, rest)) if rest.at_end() => ParseResult::Ok((result, rest)),
        _ => ParseResult::Err,
    }
}

/// A parser built on first use and reused afterwards. Recursive rules refer
/// to each other through `lazy` so that building one does not build the other
/// eagerly.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Lazy<'a, Output> {
    #[derivative(Debug = "ignore")]
    factory: Box<dyn Fn() -> BoxedParser<'a, Output> + 'a>,
    parser: OnceCell<BoxedParser<'a, Output>>,
}

impl<'a, Output> Lazy<'a, Output> {
    pub fn is_initialized(&self) -> bool {
        self.parser.get().is_some()
    }
}

impl<'a, Output> Parser<'a, Output> for Lazy<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.get_or_init(|| (self.factory)()).parse(input)
    }
}

pub fn lazy<'a, R, F>(factory: F) -> Lazy<'a, R>
where
    F: Fn() -> BoxedParser<'a, R> + 'a,
{
    Lazy {
        factory: Box::new(factory),
        parser: OnceCell::new(),
    }
}

pub fn epsilon(input: ParserInput) -> ParseResult<()> {
    ParseResult::Ok(((), input))
}

pub fn failure<R>(_input: ParserInput) -> ParseResult<R> {
    ParseResult::Err
}

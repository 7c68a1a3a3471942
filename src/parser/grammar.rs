// # ========================= START OF THE GRAMMAR =========================
//
// # Rule syntax used in the comments below:
// #
// # * Strings with single quotes (') denote RESERVED tokens
// # * Upper case names (INT, ID) denote token types
// # e1 e2      Match e1, then match e2.
// # e1 | e2    Match e1 or e2 (ordered: the first match wins).
// # [ e ]      Optionally match e.
// # e (s e)*   Match e, then fold every further (s e) pair into it, left to right.
// #
// # Every rule is a function building a fresh parser. Rules that refer back to
// # an enclosing rule do so through `lazy`, which defers building the inner
// # parser until it is first used.

use super::ast::*;
use super::combinators::*;
use super::tokenizer::{Token, TokenType as TT};

const ARITHMETIC_PRECEDENCE: [&[&str]; 2] = [&["*", "/"], &["+", "-"]];
const BOOLEAN_PRECEDENCE: [&[&str]; 2] = [&["and"], &["or"]];
const RELATIONAL_OPERATORS: [&str; 6] = ["<", "<=", ">", ">=", "=", "!="];

/// Parses a whole program. Fails unless every token is consumed.
pub fn parse(tokens: &[Token]) -> ParseResult<Statement> {
    program().parse_tokens(tokens)
}

// program: statement_list END-OF-INPUT
pub fn program<'a>() -> BoxedParser<'a, Statement> {
    BoxedParser::new(phrase(statement_list()))
}

fn keyword<'a>(lexeme: &str) -> impl Parser<'a, String> {
    reserved(lexeme, TT::RESERVED)
}

fn id<'a>() -> impl Parser<'a, String> {
    tag(TT::ID)
}

fn number<'a>() -> impl Parser<'a, i64> {
    try_map(tag(TT::INT), |lexeme: String| lexeme.parse().ok())
}

// # STATEMENTS
// # ==========

// statement_list: statement (';' statement)*
pub fn statement_list<'a>() -> BoxedParser<'a, Statement> {
    let separator =
        keyword(";").map(|_| -> Combine<'a, Statement> { Box::new(Statement::compound) });
    statement().fold(separator)
}

// statement:
//     | assign_statement
//     | if_statement
//     | while_statement
//     | repeat_statement
fn statement<'a>() -> BoxedParser<'a, Statement> {
    assign_statement()
        .or(if_statement())
        .or(while_statement())
        .or(repeat_statement())
}

// assign_statement: ID ':=' arithmetic_expression
fn assign_statement<'a>() -> BoxedParser<'a, Statement> {
    id().then(keyword(":="))
        .then(arithmetic_expression())
        .map(|((name, _), expression)| Statement::Assign(name, expression))
}

// if_statement: 'if' boolean_expression 'then' statement_list ['else' statement_list] 'end'
fn if_statement<'a>() -> BoxedParser<'a, Statement> {
    pair(
        pair(
            right(keyword("if"), boolean_expression()),
            right(keyword("then"), lazy(statement_list)),
        ),
        left(
            maybe(right(keyword("else"), lazy(statement_list))),
            keyword("end"),
        ),
    )
    .map(|((condition, then), otherwise)| Statement::if_(condition, then, otherwise))
}

// while_statement: 'while' boolean_expression 'do' statement_list 'end'
fn while_statement<'a>() -> BoxedParser<'a, Statement> {
    pair(
        right(keyword("while"), boolean_expression()),
        left(right(keyword("do"), lazy(statement_list)), keyword("end")),
    )
    .map(|(condition, body)| Statement::while_(condition, body))
}

// # The count is an INT literal, never an expression.
// repeat_statement: 'repeat' INT 'times' statement_list 'end'
fn repeat_statement<'a>() -> BoxedParser<'a, Statement> {
    pair(
        right(keyword("repeat"), number()),
        left(right(keyword("times"), lazy(statement_list)), keyword("end")),
    )
    .map(|(times, body)| Statement::repeat(times, body))
}

// # ARITHMETIC EXPRESSIONS
// # ======================

// arithmetic_expression_value: INT | ID
fn arithmetic_expression_value<'a>() -> BoxedParser<'a, ArithmeticExpression> {
    number()
        .map(ArithmeticExpression::Int)
        .or(id().map(ArithmeticExpression::Var))
}

fn only_expression_inside_parenthesis<T>(((_, expression), _): ((String, T), String)) -> T {
    expression
}

// arithmetic_expression_in_parenthesis: '(' arithmetic_expression ')'
fn arithmetic_expression_in_parenthesis<'a>() -> BoxedParser<'a, ArithmeticExpression> {
    keyword("(")
        .then(lazy(arithmetic_expression))
        .then(keyword(")"))
        .map(only_expression_inside_parenthesis)
}

// arithmetic_expression_term:
//     | arithmetic_expression_value
//     | arithmetic_expression_in_parenthesis
fn arithmetic_expression_term<'a>() -> BoxedParser<'a, ArithmeticExpression> {
    arithmetic_expression_value().or(arithmetic_expression_in_parenthesis())
}

fn process_binary_operation<'a>(operator: &str) -> Combine<'a, ArithmeticExpression> {
    let operator = operator.to_string();
    Box::new(move |left: ArithmeticExpression, right: ArithmeticExpression| {
        ArithmeticExpression::BinaryOperation(operator.clone(), Box::new(left), Box::new(right))
    })
}

fn any_operator_in_list<'a>(operators: &[&str]) -> BoxedParser<'a, String> {
    operators
        .iter()
        .fold(BoxedParser::new(failure::<String>), |parser, operator| {
            parser.or(keyword(operator))
        })
}

/// Wraps `value_parser` in one left fold per level, tightest level first, so
/// every later level takes the previous one as its operand.
fn precedence<'a, T: 'a>(
    value_parser: BoxedParser<'a, T>,
    precedence_levels: &[&[&str]],
    combine: fn(&str) -> Combine<'a, T>,
) -> BoxedParser<'a, T> {
    precedence_levels
        .iter()
        .fold(value_parser, |parser, operators| {
            parser.fold(any_operator_in_list(operators).map(move |operator| combine(&operator)))
        })
}

// arithmetic_expression:
//     | term (('*' | '/') term)*            # level 1
//     | level1 (('+' | '-') level1)*        # level 2
pub fn arithmetic_expression<'a>() -> BoxedParser<'a, ArithmeticExpression> {
    precedence(
        arithmetic_expression_term(),
        &ARITHMETIC_PRECEDENCE,
        process_binary_operation,
    )
}

// # BOOLEAN EXPRESSIONS
// # ===================

// boolean_expression_relational:
//     | arithmetic_expression ('<' | '<=' | '>' | '>=' | '=' | '!=') arithmetic_expression
fn boolean_expression_relational<'a>() -> BoxedParser<'a, BooleanExpression> {
    arithmetic_expression()
        .then(any_operator_in_list(&RELATIONAL_OPERATORS))
        .then(arithmetic_expression())
        .map(|((left, operator), right)| BooleanExpression::Relational(operator, left, right))
}

// boolean_expression_not: 'not' boolean_expression_term
fn boolean_expression_not<'a>() -> BoxedParser<'a, BooleanExpression> {
    right(keyword("not"), lazy(boolean_expression_term)).map(BooleanExpression::not)
}

// boolean_expression_in_parenthesis: '(' boolean_expression ')'
fn boolean_expression_in_parenthesis<'a>() -> BoxedParser<'a, BooleanExpression> {
    keyword("(")
        .then(lazy(boolean_expression))
        .then(keyword(")"))
        .map(only_expression_inside_parenthesis)
}

// boolean_expression_term:
//     | boolean_expression_not
//     | boolean_expression_relational
//     | boolean_expression_in_parenthesis
fn boolean_expression_term<'a>() -> BoxedParser<'a, BooleanExpression> {
    boolean_expression_not()
        .or(boolean_expression_relational())
        .or(boolean_expression_in_parenthesis())
}

fn process_logic<'a>(operator: &str) -> Combine<'a, BooleanExpression> {
    match operator {
        "and" => Box::new(BooleanExpression::and),
        "or" => Box::new(BooleanExpression::or),
        _ => unreachable!("unknown logic operator: {operator}"),
    }
}

// boolean_expression:
//     | term ('and' term)*                  # level 1
//     | level1 ('or' level1)*               # level 2
pub fn boolean_expression<'a>() -> BoxedParser<'a, BooleanExpression> {
    precedence(
        boolean_expression_term(),
        &BOOLEAN_PRECEDENCE,
        process_logic,
    )
}

use proptest::prelude::*;

use imp::parser::combinators::{either, maybe, pair, tag, zero_or_more, Parser};
use imp::{run, Environment, Token, TokenType};

fn token_types() -> impl Strategy<Value = Vec<TokenType>> {
    prop::collection::vec(prop_oneof![Just(TokenType::ID), Just(TokenType::INT)], 0..8)
}

fn tokens_of(types: &[TokenType]) -> Vec<Token> {
    types
        .iter()
        .enumerate()
        .map(|(i, typ)| match typ {
            TokenType::INT => Token::new(i.to_string(), *typ),
            _ => Token::new(format!("v{i}"), *typ),
        })
        .collect()
}

fn leading(types: &[TokenType], typ: TokenType) -> usize {
    types.iter().take_while(|t| **t == typ).count()
}

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Binary(&'static str, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn render(&self) -> String {
        match self {
            Expr::Int(i) => i.to_string(),
            Expr::Binary(operator, left, right) => {
                format!("({} {operator} {})", left.render(), right.render())
            }
        }
    }

    fn value(&self) -> i64 {
        match self {
            Expr::Int(i) => *i,
            Expr::Binary("+", left, right) => left.value() + right.value(),
            Expr::Binary("-", left, right) => left.value() - right.value(),
            Expr::Binary(_, left, right) => left.value() * right.value(),
        }
    }
}

fn expressions() -> impl Strategy<Value = Expr> {
    (0i64..10).prop_map(Expr::Int).prop_recursive(4, 16, 2, |inner| {
        (prop_oneof![Just("+"), Just("-"), Just("*")], inner.clone(), inner)
            .prop_map(|(operator, left, right)| Expr::Binary(operator, Box::new(left), Box::new(right)))
    })
}

proptest! {
    #[test]
    fn maybe_never_fails(types in token_types()) {
        let tokens = tokens_of(&types);
        let parser = maybe(tag(TokenType::ID));
        let result = parser.parse_tokens(&tokens);
        prop_assert_eq!(result.position(), Some(leading(&types, TokenType::ID).min(1)));
    }

    #[test]
    fn zero_or_more_consumes_the_matching_prefix(types in token_types()) {
        let tokens = tokens_of(&types);
        let parser = zero_or_more(tag(TokenType::INT));
        let result = parser.parse_tokens(&tokens);
        let count = leading(&types, TokenType::INT);
        prop_assert_eq!(result.position(), Some(count));
        prop_assert_eq!(result.into_value().map(|v| v.len()), Some(count));
    }

    #[test]
    fn either_prefers_the_first_parser(types in token_types()) {
        let tokens = tokens_of(&types);
        let first = pair(tag(TokenType::ID), tag(TokenType::ID)).map(|_| "first");
        let second = tag(TokenType::ID).map(|_| "second");
        let result = either(first, second).parse_tokens(&tokens);
        let expected = match leading(&types, TokenType::ID) {
            0 => None,
            1 => Some(("second", 1)),
            _ => Some(("first", 2)),
        };
        prop_assert_eq!(result.value().copied().zip(result.position()), expected);
    }

    #[test]
    fn pair_nesting_consumes_the_same_tokens(types in token_types()) {
        let tokens = tokens_of(&types);
        let nested_left = pair(pair(tag(TokenType::ID), tag(TokenType::INT)), tag(TokenType::ID));
        let nested_right = pair(tag(TokenType::ID), pair(tag(TokenType::INT), tag(TokenType::ID)));
        let left = nested_left.parse_tokens(&tokens);
        let right = nested_right.parse_tokens(&tokens);
        prop_assert_eq!(left.position(), right.position());
        prop_assert_eq!(
            left.into_value().map(|((a, b), c)| (a, b, c)),
            right.into_value().map(|(a, (b, c))| (a, b, c))
        );
    }

    #[test]
    fn parenthesized_arithmetic_matches_direct_evaluation(expr in expressions()) {
        let mut env = Environment::new();
        run(&format!("x := {}", expr.render()), &mut env).unwrap();
        prop_assert_eq!(env.get("x"), expr.value());
    }

    #[test]
    fn unparenthesized_chain_binds_multiplication_first(
        a in 0i64..100,
        b in 0i64..100,
        c in 0i64..100,
        d in 0i64..100,
    ) {
        let mut env = Environment::new();
        run(&format!("x := {a} - {b} * {c} + {d}"), &mut env).unwrap();
        prop_assert_eq!(env.get("x"), a - b * c + d);
    }
}

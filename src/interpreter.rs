use std::collections::HashMap;

use thiserror::Error;

use crate::parser::{ArithmeticExpression, BooleanExpression, Statement};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The grammar produced an operator the evaluator does not know.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow evaluating {left} {operator} {right}")]
    Overflow {
        operator: String,
        left: i64,
        right: i64,
    },
}

/// Variable bindings of one program run. Unbound names read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(HashMap<String, i64>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }
    pub fn set(&mut self, name: &str, value: i64) {
        self.0.insert(name.to_string(), value);
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
    /// All bindings, sorted by name.
    pub fn bindings(&self) -> Vec<(&str, i64)> {
        let mut bindings: Vec<_> = self.iter().collect();
        bindings.sort_unstable_by(|a, b| a.0.cmp(b.0));
        bindings
    }
}

impl<const N: usize> From<[(&str, i64); N]> for Environment {
    fn from(bindings: [(&str, i64); N]) -> Self {
        Self(
            bindings
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

pub fn evaluate(statement: &Statement, env: &mut Environment) -> Result<(), EvalError> {
    match statement {
        Statement::Assign(name, expression) => {
            let value = evaluate_arithmetic(expression, env)?;
            env.set(name, value);
        }
        Statement::Compound(first, second) => {
            evaluate(first, env)?;
            evaluate(second, env)?;
        }
        Statement::If(condition, then, otherwise) => {
            if evaluate_boolean(condition, env)? {
                evaluate(then, env)?;
            } else if let Some(otherwise) = otherwise {
                evaluate(otherwise, env)?;
            }
        }
        Statement::While(condition, body) => {
            while evaluate_boolean(condition, env)? {
                evaluate(body, env)?;
            }
        }
        Statement::Repeat(times, body) => {
            for _ in 0..*times {
                evaluate(body, env)?;
            }
        }
    }
    Ok(())
}

pub fn evaluate_arithmetic(
    expression: &ArithmeticExpression,
    env: &Environment,
) -> Result<i64, EvalError> {
    match expression {
        ArithmeticExpression::Int(i) => Ok(*i),
        ArithmeticExpression::Var(name) => Ok(env.get(name)),
        ArithmeticExpression::BinaryOperation(operator, left, right) => {
            let left = evaluate_arithmetic(left, env)?;
            let right = evaluate_arithmetic(right, env)?;
            apply_arithmetic(operator, left, right)
        }
    }
}

fn apply_arithmetic(operator: &str, left: i64, right: i64) -> Result<i64, EvalError> {
    let result = match operator {
        "+" => left.checked_add(right),
        "-" => left.checked_sub(right),
        "*" => left.checked_mul(right),
        "/" if right == 0 => return Err(EvalError::DivisionByZero),
        "/" => left.checked_div(right),
        _ => return Err(EvalError::UnknownOperator(operator.to_string())),
    };
    result.ok_or_else(|| EvalError::Overflow {
        operator: operator.to_string(),
        left,
        right,
    })
}

/// Both operands of `and`/`or` are always evaluated.
pub fn evaluate_boolean(
    expression: &BooleanExpression,
    env: &Environment,
) -> Result<bool, EvalError> {
    match expression {
        BooleanExpression::Relational(operator, left, right) => {
            let left = evaluate_arithmetic(left, env)?;
            let right = evaluate_arithmetic(right, env)?;
            match operator.as_str() {
                "<" => Ok(left < right),
                "<=" => Ok(left <= right),
                ">" => Ok(left > right),
                ">=" => Ok(left >= right),
                "=" => Ok(left == right),
                "!=" => Ok(left != right),
                _ => Err(EvalError::UnknownOperator(operator.clone())),
            }
        }
        BooleanExpression::And(left, right) => {
            let left = evaluate_boolean(left, env)?;
            let right = evaluate_boolean(right, env)?;
            Ok(left && right)
        }
        BooleanExpression::Or(left, right) => {
            let left = evaluate_boolean(left, env)?;
            let right = evaluate_boolean(right, env)?;
            Ok(left || right)
        }
        BooleanExpression::Not(expression) => Ok(!evaluate_boolean(expression, env)?),
    }
}

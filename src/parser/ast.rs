#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticExpression {
    Int(i64),
    Var(String),
    BinaryOperation(
        String,                    // operator
        Box<ArithmeticExpression>, // left
        Box<ArithmeticExpression>, // right
    ),
}

impl ArithmeticExpression {
    pub fn var(name: &str) -> Self {
        Self::Var(name.to_string())
    }
    pub fn binary(operator: &str, left: Self, right: Self) -> Self {
        Self::BinaryOperation(operator.to_string(), Box::new(left), Box::new(right))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpression {
    Relational(String, ArithmeticExpression, ArithmeticExpression),
    And(Box<BooleanExpression>, Box<BooleanExpression>),
    Or(Box<BooleanExpression>, Box<BooleanExpression>),
    Not(Box<BooleanExpression>),
}

impl BooleanExpression {
    pub fn relational(
        operator: &str,
        left: ArithmeticExpression,
        right: ArithmeticExpression,
    ) -> Self {
        Self::Relational(operator.to_string(), left, right)
    }
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }
    pub fn not(expression: Self) -> Self {
        Self::Not(Box::new(expression))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign(String, ArithmeticExpression),
    Compound(Box<Statement>, Box<Statement>),
    If(
        BooleanExpression,      // condition
        Box<Statement>,         // then
        Option<Box<Statement>>, // else
    ),
    While(BooleanExpression, Box<Statement>),
    Repeat(i64, Box<Statement>),
}

impl Statement {
    pub fn assign(name: &str, expression: ArithmeticExpression) -> Self {
        Self::Assign(name.to_string(), expression)
    }
    pub fn compound(first: Self, second: Self) -> Self {
        Self::Compound(Box::new(first), Box::new(second))
    }
    pub fn if_(condition: BooleanExpression, then: Self, otherwise: Option<Self>) -> Self {
        Self::If(condition, Box::new(then), otherwise.map(Box::new))
    }
    pub fn while_(condition: BooleanExpression, body: Self) -> Self {
        Self::While(condition, Box::new(body))
    }
    pub fn repeat(times: i64, body: Self) -> Self {
        Self::Repeat(times, Box::new(body))
    }
}

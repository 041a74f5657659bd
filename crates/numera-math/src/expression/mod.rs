//! Real-valued functions of one variable.
//!
//! An [`Expression`] is parsed once from text and then evaluated any number
//! of times. It can differentiate itself symbolically; expressions built on
//! piecewise functions (`floor`, `ceil`, `sign`) fall back to centered
//! finite differences, see [`Derivative`].
//!
//! # Example
//!
//! ```rust
//! use numera_math::expression::Expression;
//!
//! let f = Expression::parse("x^3 - x - 2").unwrap();
//! assert_eq!(f.evaluate(2.0).unwrap(), 4.0);
//!
//! let df = f.derivative(1);
//! assert_eq!(df.evaluate(2.0).unwrap(), 11.0);
//! assert_eq!(df.to_string(), "3 * x^2 - 1");
//! ```

mod derivative;
mod parser;
mod tokenizer;

use std::fmt;
use std::str::FromStr;

pub use derivative::Derivative;

use crate::error::{EvalResult, ExprError};

/// Name of the variable used by [`Expression::parse`].
pub const DEFAULT_VARIABLE: &str = "x";

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
}

impl BinaryOp {
    /// Binding strength, higher binds tighter.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 2,
            Self::Mul | Self::Div => 3,
            Self::Pow => 5,
        }
    }

    pub(crate) fn is_right_associative(self) -> bool {
        self == Self::Pow
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => " * ",
            Self::Div => " / ",
            Self::Pow => "^",
        }
    }

    /// Applies the operator.
    pub fn apply(self, a: f64, b: f64) -> EvalResult {
        match self {
            Self::Add => Ok(a + b),
            Self::Sub => Ok(a - b),
            Self::Mul => Ok(a * b),
            Self::Div if b == 0.0 => Err(ExprError::DivisionByZero),
            Self::Div => Ok(a / b),
            Self::Pow => power(a, b),
        }
    }
}

fn power(base: f64, exponent: f64) -> EvalResult {
    if base == 0.0 && exponent < 0.0 {
        return Err(ExprError::DivisionByZero);
    }
    if exponent.fract() == 0.0 && exponent.abs() <= f64::from(i32::MAX) {
        return Ok(base.powi(exponent as i32));
    }
    if base < 0.0 {
        return Err(ExprError::Domain {
            function: "pow",
            argument: base,
        });
    }
    Ok(base.powf(exponent))
}

/// Elementary function available in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm, spelled `ln` or `log`.
    Ln,
    Log10,
    Log2,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Ceil,
    Sign,
}

impl Function {
    /// Looks a function up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "log10" => Self::Log10,
            "log2" => Self::Log2,
            "sqrt" => Self::Sqrt,
            "cbrt" => Self::Cbrt,
            "abs" => Self::Abs,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "sign" => Self::Sign,
            _ => return None,
        };
        Some(function)
    }

    /// Returns the canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Log2 => "log2",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Sign => "sign",
        }
    }

    /// Applies the function, rejecting arguments outside its domain.
    pub fn apply(self, x: f64) -> EvalResult {
        let domain = |ok: bool, value: f64| {
            if ok {
                Ok(value)
            } else {
                Err(ExprError::Domain {
                    function: self.name(),
                    argument: x,
                })
            }
        };
        match self {
            Self::Sin => Ok(x.sin()),
            Self::Cos => Ok(x.cos()),
            Self::Tan => Ok(x.tan()),
            Self::Asin => domain((-1.0..=1.0).contains(&x), x.asin()),
            Self::Acos => domain((-1.0..=1.0).contains(&x), x.acos()),
            Self::Atan => Ok(x.atan()),
            Self::Sinh => Ok(x.sinh()),
            Self::Cosh => Ok(x.cosh()),
            Self::Tanh => Ok(x.tanh()),
            Self::Exp => Ok(x.exp()),
            Self::Ln => domain(x > 0.0, x.ln()),
            Self::Log10 => domain(x > 0.0, x.log10()),
            Self::Log2 => domain(x > 0.0, x.log2()),
            Self::Sqrt => domain(x >= 0.0, x.sqrt()),
            Self::Cbrt => Ok(x.cbrt()),
            Self::Abs => Ok(x.abs()),
            Self::Floor => Ok(x.floor()),
            Self::Ceil => Ok(x.ceil()),
            Self::Sign => Ok(if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }),
        }
    }

    /// True for the piecewise functions without a symbolic derivative.
    pub fn is_piecewise(self) -> bool {
        matches!(self, Self::Floor | Self::Ceil | Self::Sign)
    }
}

/// Named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedConstant {
    /// π
    Pi,
    /// Euler's number.
    E,
}

impl NamedConstant {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    /// Returns the value.
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

/// Node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal.
    Constant(f64),
    /// `pi` or `e`.
    Named(NamedConstant),
    /// The expression's variable.
    Variable,
    /// Unary minus.
    Neg(Box<Node>),
    /// Binary operation.
    Binary(BinaryOp, Box<Node>, Box<Node>),
    /// Function application.
    Call(Function, Box<Node>),
}

impl Node {
    fn eval(&self, x: f64) -> EvalResult {
        match self {
            Self::Constant(c) => Ok(*c),
            Self::Named(c) => Ok(c.value()),
            Self::Variable => Ok(x),
            Self::Neg(a) => Ok(-a.eval(x)?),
            Self::Binary(op, a, b) => op.apply(a.eval(x)?, b.eval(x)?),
            Self::Call(f, a) => f.apply(a.eval(x)?),
        }
    }

    /// True if the subtree mentions the variable.
    pub fn depends_on_variable(&self) -> bool {
        match self {
            Self::Constant(_) | Self::Named(_) => false,
            Self::Variable => true,
            Self::Neg(a) | Self::Call(_, a) => a.depends_on_variable(),
            Self::Binary(_, a, b) => a.depends_on_variable() || b.depends_on_variable(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Binary(op, _, _) => op.precedence(),
            Self::Neg(_) => 4,
            Self::Constant(c) if c.is_sign_negative() => 4,
            _ => 6,
        }
    }

    fn write(&self, variable: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Named(c) => f.write_str(c.name()),
            Self::Variable => f.write_str(variable),
            Self::Neg(a) => {
                f.write_str("-")?;
                self.write_operand(a, a.precedence() <= 4, variable, f)
            }
            Self::Binary(op, a, b) => {
                let p = op.precedence();
                let (left_parens, right_parens) = if op.is_right_associative() {
                    (a.precedence() <= p, b.precedence() < p)
                } else {
                    (a.precedence() < p, b.precedence() <= p)
                };
                self.write_operand(a, left_parens, variable, f)?;
                f.write_str(op.symbol())?;
                self.write_operand(b, right_parens, variable, f)
            }
            Self::Call(func, a) => {
                write!(f, "{}(", func.name())?;
                a.write(variable, f)?;
                f.write_str(")")
            }
        }
    }

    fn write_operand(
        &self,
        operand: &Node,
        parens: bool,
        variable: &str,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if parens {
            f.write_str("(")?;
            operand.write(variable, f)?;
            f.write_str(")")
        } else {
            operand.write(variable, f)
        }
    }
}

/// A parsed real function of one named variable.
///
/// Immutable once built; evaluation is deterministic and free of side
/// effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    variable: String,
    root: Node,
}

impl Expression {
    /// Parses `text` as a function of `x`.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        Self::parse_in(text, DEFAULT_VARIABLE)
    }

    /// Parses `text` as a function of `variable`.
    pub fn parse_in(text: &str, variable: &str) -> Result<Self, ExprError> {
        let root = parser::parse(text, variable)?;
        Ok(Self {
            variable: variable.to_string(),
            root,
        })
    }

    pub(crate) fn from_node(root: Node, variable: &str) -> Self {
        Self {
            variable: variable.to_string(),
            root,
        }
    }

    /// Returns the variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns the root of the expression tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluates the expression at `x`.
    ///
    /// # Errors
    ///
    /// Division by an exact zero, a function applied outside its domain, or
    /// a non-finite result.
    pub fn evaluate(&self, x: f64) -> EvalResult {
        let value = self.root.eval(x)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExprError::NonFinite { at: x })
        }
    }

    /// Returns the derivative of the given order.
    ///
    /// Symbolic whenever every function in the expression has a rule;
    /// otherwise a finite-difference approximation of the original.
    pub fn derivative(&self, order: u32) -> Derivative {
        let mut current = self.root.clone();
        for _ in 0..order {
            match derivative::differentiate(&current) {
                Some(next) => current = next,
                None => return self.numerical_derivative(order),
            }
        }
        Derivative::Symbolic(Self::from_node(current, &self.variable))
    }

    /// Returns a finite-difference derivative of the given order.
    pub fn numerical_derivative(&self, order: u32) -> Derivative {
        Derivative::Numerical {
            base: self.clone(),
            order,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write(&self.variable, f)
    }
}

impl FromStr for Expression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

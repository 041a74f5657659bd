//! Symbolic differentiation with a finite-difference fallback.

use std::fmt;

use super::{BinaryOp, Expression, Function, Node};
use crate::error::{EvalResult, ExprError};

/// Step for first-order centered differences.
const FIRST_ORDER_STEP: f64 = 1e-6;

/// Step for nested higher-order centered differences.
const HIGHER_ORDER_STEP: f64 = 1e-4;

/// Derivative of an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Derivative {
    /// Closed-form derivative.
    Symbolic(Expression),
    /// Centered finite differences of `base`, nested `order` times.
    Numerical {
        /// The function being differentiated.
        base: Expression,
        /// Derivative order.
        order: u32,
    },
}

impl Derivative {
    /// Evaluates the derivative at `x`.
    pub fn evaluate(&self, x: f64) -> EvalResult {
        match self {
            Self::Symbolic(expr) => expr.evaluate(x),
            Self::Numerical { base, order } => {
                let h = if *order <= 1 {
                    FIRST_ORDER_STEP
                } else {
                    HIGHER_ORDER_STEP
                };
                let value = central_difference(base, x, *order, h)?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ExprError::NonFinite { at: x })
                }
            }
        }
    }

    /// True if the derivative is closed-form.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }
}

impl fmt::Display for Derivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic(expr) => write!(f, "{expr}"),
            Self::Numerical { base, order } => {
                write!(f, "d^{order}/d{}^{order} [{base}] (finite differences)", base.variable())
            }
        }
    }
}

fn central_difference(base: &Expression, x: f64, order: u32, h: f64) -> EvalResult {
    if order == 0 {
        return base.evaluate(x);
    }
    let forward = central_difference(base, x + h, order - 1, h)?;
    let backward = central_difference(base, x - h, order - 1, h)?;
    Ok((forward - backward) / (2.0 * h))
}

/// Differentiates a tree with respect to its variable.
///
/// Returns `None` when a piecewise function is applied to a subtree that
/// depends on the variable.
pub(crate) fn differentiate(node: &Node) -> Option<Node> {
    if !node.depends_on_variable() {
        return Some(constant(0.0));
    }
    let d = match node {
        Node::Constant(_) | Node::Named(_) => constant(0.0),
        Node::Variable => constant(1.0),
        Node::Neg(u) => neg(differentiate(u)?),
        Node::Binary(op, u, v) => {
            let (u, v) = (u.as_ref(), v.as_ref());
            match op {
                BinaryOp::Add => add(differentiate(u)?, differentiate(v)?),
                BinaryOp::Sub => sub(differentiate(u)?, differentiate(v)?),
                BinaryOp::Mul => add(
                    mul(differentiate(u)?, v.clone()),
                    mul(u.clone(), differentiate(v)?),
                ),
                BinaryOp::Div => div(
                    sub(
                        mul(differentiate(u)?, v.clone()),
                        mul(u.clone(), differentiate(v)?),
                    ),
                    pow(v.clone(), constant(2.0)),
                ),
                BinaryOp::Pow => power_rule(u, v)?,
            }
        }
        Node::Call(function, u) => {
            let outer = function_rule(*function, u)?;
            mul(outer, differentiate(u)?)
        }
    };
    Some(d)
}

fn power_rule(u: &Node, v: &Node) -> Option<Node> {
    if !v.depends_on_variable() {
        // v * u^(v - 1) * u'
        let reduced = sub(v.clone(), constant(1.0));
        return Some(mul(mul(v.clone(), pow(u.clone(), reduced)), differentiate(u)?));
    }
    let uv = pow(u.clone(), v.clone());
    if !u.depends_on_variable() {
        // u^v * ln(u) * v'
        return Some(mul(mul(uv, call(Function::Ln, u.clone())), differentiate(v)?));
    }
    // u^v * (v' ln(u) + v u' / u)
    Some(mul(
        uv,
        add(
            mul(differentiate(v)?, call(Function::Ln, u.clone())),
            div(mul(v.clone(), differentiate(u)?), u.clone()),
        ),
    ))
}

/// Outer derivative `f'(u)` of an elementary function.
fn function_rule(function: Function, u: &Node) -> Option<Node> {
    let u = u.clone();
    let rule = match function {
        Function::Sin => call(Function::Cos, u),
        Function::Cos => neg(call(Function::Sin, u)),
        Function::Tan => div(constant(1.0), pow(call(Function::Cos, u), constant(2.0))),
        Function::Asin => div(
            constant(1.0),
            call(Function::Sqrt, sub(constant(1.0), pow(u, constant(2.0)))),
        ),
        Function::Acos => neg(div(
            constant(1.0),
            call(Function::Sqrt, sub(constant(1.0), pow(u, constant(2.0)))),
        )),
        Function::Atan => div(constant(1.0), add(constant(1.0), pow(u, constant(2.0)))),
        Function::Sinh => call(Function::Cosh, u),
        Function::Cosh => call(Function::Sinh, u),
        Function::Tanh => div(constant(1.0), pow(call(Function::Cosh, u), constant(2.0))),
        Function::Exp => call(Function::Exp, u),
        Function::Ln => div(constant(1.0), u),
        Function::Log10 => div(constant(1.0), mul(u, constant(std::f64::consts::LN_10))),
        Function::Log2 => div(constant(1.0), mul(u, constant(std::f64::consts::LN_2))),
        Function::Sqrt => div(constant(1.0), mul(constant(2.0), call(Function::Sqrt, u))),
        Function::Cbrt => div(
            constant(1.0),
            mul(constant(3.0), pow(call(Function::Cbrt, u), constant(2.0))),
        ),
        Function::Abs => div(u.clone(), call(Function::Abs, u)),
        Function::Floor | Function::Ceil | Function::Sign => return None,
    };
    Some(rule)
}

// Simplifying constructors. Each folds constant operands and drops identity
// elements so derivative trees stay readable.

fn constant(value: f64) -> Node {
    Node::Constant(value)
}

fn as_constant(node: &Node) -> Option<f64> {
    match node {
        Node::Constant(c) => Some(*c),
        _ => None,
    }
}

fn fold(op: BinaryOp, a: &Node, b: &Node) -> Option<Node> {
    let (a, b) = (as_constant(a)?, as_constant(b)?);
    op.apply(a, b)
        .ok()
        .filter(|value| value.is_finite())
        .map(constant)
}

fn binary(op: BinaryOp, a: Node, b: Node) -> Node {
    Node::Binary(op, Box::new(a), Box::new(b))
}

fn call(function: Function, u: Node) -> Node {
    Node::Call(function, Box::new(u))
}

fn neg(a: Node) -> Node {
    match a {
        Node::Constant(c) => constant(-c),
        Node::Neg(inner) => *inner,
        other => Node::Neg(Box::new(other)),
    }
}

fn add(a: Node, b: Node) -> Node {
    if let Some(folded) = fold(BinaryOp::Add, &a, &b) {
        return folded;
    }
    match (as_constant(&a), as_constant(&b)) {
        (Some(c), _) if c == 0.0 => return b,
        (_, Some(c)) if c == 0.0 => return a,
        (_, Some(c)) if c < 0.0 => return sub(a, constant(-c)),
        _ => {}
    }
    match b {
        Node::Neg(inner) => sub(a, *inner),
        b => binary(BinaryOp::Add, a, b),
    }
}

fn sub(a: Node, b: Node) -> Node {
    if let Some(folded) = fold(BinaryOp::Sub, &a, &b) {
        return folded;
    }
    match (as_constant(&a), as_constant(&b)) {
        (_, Some(c)) if c == 0.0 => return a,
        (Some(c), _) if c == 0.0 => return neg(b),
        _ => {}
    }
    match b {
        Node::Neg(inner) => add(a, *inner),
        b => binary(BinaryOp::Sub, a, b),
    }
}

fn mul(a: Node, b: Node) -> Node {
    if let Some(folded) = fold(BinaryOp::Mul, &a, &b) {
        return folded;
    }
    match (as_constant(&a), as_constant(&b)) {
        (Some(c), _) | (_, Some(c)) if c == 0.0 => return constant(0.0),
        (Some(c), _) if c == 1.0 => return b,
        (_, Some(c)) if c == 1.0 => return a,
        (Some(c), _) if c == -1.0 => return neg(b),
        (_, Some(c)) if c == -1.0 => return neg(a),
        // Constants go in front: `2 * x` rather than `x * 2`.
        (None, Some(_)) => return mul(b, a),
        _ => {}
    }
    match (a, b) {
        (Node::Neg(a), b) => neg(mul(*a, b)),
        (a, Node::Neg(b)) => neg(mul(a, *b)),
        (a, b) => binary(BinaryOp::Mul, a, b),
    }
}

fn div(a: Node, b: Node) -> Node {
    if let Some(folded) = fold(BinaryOp::Div, &a, &b) {
        return folded;
    }
    match (as_constant(&a), as_constant(&b)) {
        (Some(c), _) if c == 0.0 => return constant(0.0),
        (_, Some(c)) if c == 1.0 => return a,
        _ => {}
    }
    match (a, b) {
        (Node::Neg(a), b) => neg(div(*a, b)),
        (a, b) => binary(BinaryOp::Div, a, b),
    }
}

fn pow(a: Node, b: Node) -> Node {
    if let Some(folded) = fold(BinaryOp::Pow, &a, &b) {
        return folded;
    }
    match as_constant(&b) {
        Some(c) if c == 0.0 => constant(1.0),
        Some(c) if c == 1.0 => a,
        _ => binary(BinaryOp::Pow, a, b),
    }
}

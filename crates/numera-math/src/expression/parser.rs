//! Shunting-yard parser: tokens to postfix, postfix to tree.

use super::tokenizer::{tokenize, Token, TokenKind};
use super::{BinaryOp, Function, NamedConstant, Node};
use crate::error::ExprError;

/// Unary minus binds tighter than `*` but looser than `^`.
const NEG_PRECEDENCE: u8 = 4;

#[derive(Debug)]
enum Postfix {
    Operand(Node),
    Neg,
    Binary(BinaryOp),
    Call(Function),
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Binary(BinaryOp),
    Neg,
    Call(Function),
}

impl Operator {
    /// Functions are only closed by their parenthesis, never by precedence.
    fn precedence(self) -> Option<u8> {
        match self {
            Self::Binary(op) => Some(op.precedence()),
            Self::Neg => Some(NEG_PRECEDENCE),
            Self::Call(_) => None,
        }
    }
}

impl From<Operator> for Postfix {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Binary(op) => Self::Binary(op),
            Operator::Neg => Self::Neg,
            Operator::Call(function) => Self::Call(function),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Op(Operator),
    LParen(usize),
}

/// Parses `source` into an expression tree over `variable`.
pub(crate) fn parse(source: &str, variable: &str) -> Result<Node, ExprError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExprError::parse("", 0, "empty expression"));
    }
    let postfix = to_postfix(source, variable, &tokens)?;
    build(source, postfix)
}

fn to_postfix(source: &str, variable: &str, tokens: &[Token]) -> Result<Vec<Postfix>, ExprError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();
    let mut expect_operand = true;
    let mut previous: Option<&Token> = None;

    for (index, token) in tokens.iter().enumerate() {
        let fragment = token.text(source);

        // Implicit multiplication: `2x`, `3(x+1)`, `(x+1)(x-1)`.
        if !expect_operand && token.starts_operand() {
            if let (Some(prev), TokenKind::Number(_)) = (previous, &token.kind) {
                if matches!(prev.kind, TokenKind::Number(_)) {
                    return Err(ExprError::parse(fragment, token.offset, "missing operator"));
                }
            }
            push_binary(&mut output, &mut stack, BinaryOp::Mul);
            expect_operand = true;
        }

        match &token.kind {
            TokenKind::Number(value) => {
                output.push(Postfix::Operand(Node::Constant(*value)));
                expect_operand = false;
            }
            TokenKind::Ident(name) => {
                if name == variable {
                    output.push(Postfix::Operand(Node::Variable));
                    expect_operand = false;
                } else if let Some(constant) = NamedConstant::from_name(name) {
                    output.push(Postfix::Operand(Node::Named(constant)));
                    expect_operand = false;
                } else if let Some(function) = Function::from_name(name) {
                    let next = tokens.get(index + 1).map(|t| &t.kind);
                    if next != Some(&TokenKind::LParen) {
                        return Err(ExprError::parse(
                            fragment,
                            token.offset,
                            "expected '(' after function name",
                        ));
                    }
                    stack.push(Pending::Op(Operator::Call(function)));
                } else {
                    return Err(ExprError::parse(fragment, token.offset, "unknown identifier"));
                }
            }
            TokenKind::Minus if expect_operand => stack.push(Pending::Op(Operator::Neg)),
            TokenKind::Plus if expect_operand => {}
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Caret => {
                if expect_operand {
                    return Err(ExprError::parse(fragment, token.offset, "missing operand"));
                }
                let op = match token.kind {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Sub,
                    TokenKind::Star => BinaryOp::Mul,
                    TokenKind::Slash => BinaryOp::Div,
                    _ => BinaryOp::Pow,
                };
                push_binary(&mut output, &mut stack, op);
                expect_operand = true;
            }
            TokenKind::LParen => {
                stack.push(Pending::LParen(token.offset));
                expect_operand = true;
            }
            TokenKind::RParen => {
                if expect_operand {
                    return Err(ExprError::parse(fragment, token.offset, "missing operand"));
                }
                loop {
                    match stack.pop() {
                        Some(Pending::LParen(_)) => break,
                        Some(Pending::Op(op)) => output.push(op.into()),
                        None => {
                            return Err(ExprError::parse(
                                fragment,
                                token.offset,
                                "unbalanced parenthesis",
                            ))
                        }
                    }
                }
                if let Some(Pending::Op(Operator::Call(function))) = stack.last().copied() {
                    stack.pop();
                    output.push(Postfix::Call(function));
                }
                expect_operand = false;
            }
        }
        previous = Some(token);
    }

    if expect_operand {
        let offset = source.trim_end().len();
        return Err(ExprError::parse("", offset, "missing operand at end of expression"));
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => output.push(op.into()),
            Pending::LParen(offset) => {
                return Err(ExprError::parse("(", offset, "unbalanced parenthesis"))
            }
        }
    }

    Ok(output)
}

fn push_binary(output: &mut Vec<Postfix>, stack: &mut Vec<Pending>, op: BinaryOp) {
    let p = op.precedence();
    while let Some(&Pending::Op(top)) = stack.last() {
        let Some(top_p) = top.precedence() else {
            break;
        };
        let pops = top_p > p || (top_p == p && !op.is_right_associative());
        if !pops {
            break;
        }
        stack.pop();
        output.push(top.into());
    }
    stack.push(Pending::Op(Operator::Binary(op)));
}

fn build(source: &str, postfix: Vec<Postfix>) -> Result<Node, ExprError> {
    let malformed = || ExprError::parse(source, 0, "malformed expression");
    let mut stack: Vec<Node> = Vec::new();

    for item in postfix {
        let node = match item {
            Postfix::Operand(node) => node,
            Postfix::Neg => Node::Neg(Box::new(stack.pop().ok_or_else(malformed)?)),
            Postfix::Call(function) => {
                Node::Call(function, Box::new(stack.pop().ok_or_else(malformed)?))
            }
            Postfix::Binary(op) => {
                let right = stack.pop().ok_or_else(malformed)?;
                let left = stack.pop().ok_or_else(malformed)?;
                Node::Binary(op, Box::new(left), Box::new(right))
            }
        };
        stack.push(node);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_x(source: &str) -> Result<Node, ExprError> {
        parse(source, "x")
    }

    fn offset_of(err: ExprError) -> (String, usize) {
        match err {
            ExprError::Parse {
                fragment, offset, ..
            } => (fragment, offset),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_minus_binds_below_power() {
        let node = parse_x("-x^2").unwrap();
        assert!(matches!(
            node,
            Node::Neg(inner) if matches!(*inner, Node::Binary(BinaryOp::Pow, _, _))
        ));
    }

    #[test]
    fn test_power_is_right_associative() {
        let node = parse_x("x^2^3").unwrap();
        match node {
            Node::Binary(BinaryOp::Pow, left, right) => {
                assert_eq!(*left, Node::Variable);
                assert!(matches!(*right, Node::Binary(BinaryOp::Pow, _, _)));
            }
            other => panic!("unexpected tree {other:?}"),
        }
    }

    #[test]
    fn test_errors_carry_fragment_and_offset() {
        assert_eq!(offset_of(parse_x("x + y").unwrap_err()), ("y".to_string(), 4));
        assert_eq!(offset_of(parse_x("(x + 1").unwrap_err()), ("(".to_string(), 0));
        assert_eq!(offset_of(parse_x("x + 1)").unwrap_err()), (")".to_string(), 5));
        assert_eq!(offset_of(parse_x("x * * 2").unwrap_err()), ("*".to_string(), 4));
        assert_eq!(offset_of(parse_x("sin x").unwrap_err()), ("sin".to_string(), 0));
        assert_eq!(offset_of(parse_x("2 3").unwrap_err()), ("3".to_string(), 2));
        assert_eq!(offset_of(parse_x("").unwrap_err()), (String::new(), 0));
        assert_eq!(offset_of(parse_x("x +").unwrap_err()).1, 3);
        assert!(parse_x("()").is_err());
    }

    #[test]
    fn test_unary_plus_is_ignored() {
        assert_eq!(parse_x("+x").unwrap(), Node::Variable);
    }
}

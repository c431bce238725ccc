//! Binary operator semantics over runtime values.
//!
//! `+` concatenates when either side is a string, otherwise both sides must
//! be the same numeric kind. Integer division truncates toward zero; decimal
//! division rounds half-even at the dividend's scale. Ordering requires both
//! sides to be the same comparable primitive; equality never fails.

use std::cmp::Ordering;
use std::sync::Arc;

use bigdecimal::RoundingMode;
use num_traits::Zero as _;
use rill_ir::{BinaryOp, NodeRef, StringInterner};

use crate::error::{EvalError, EvalErrorKind};
use crate::value::Value;

pub(crate) fn apply(
    op: BinaryOp,
    left: Value,
    right: Value,
    interner: &StringInterner,
    node: NodeRef,
) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => add(left, right, interner, node),
        BinaryOp::Sub | BinaryOp::Mul => numeric(op, left, right, node),
        BinaryOp::Div => divide(left, right, node),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, &left, &right, node)?;
            let holds = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(holds))
        }
        // Short-circuit forms are handled by the evaluator.
        BinaryOp::And | BinaryOp::Or => Err(EvalError::new(
            EvalErrorKind::TypeError(format!("`{op}` is not a value operator")),
            node,
        )),
    }
}

fn add(
    left: Value,
    right: Value,
    interner: &StringInterner,
    node: NodeRef,
) -> Result<Value, EvalError> {
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let text = format!("{}{}", left.print(interner), right.print(interner));
        return Ok(Value::Str(Arc::from(text)));
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a + b)),
        (left, right) => Err(invalid(BinaryOp::Add, &left, &right, node)),
    }
}

fn numeric(op: BinaryOp, left: Value, right: Value, node: NodeRef) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(if op == BinaryOp::Sub {
            a - b
        } else {
            a * b
        })),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(if op == BinaryOp::Sub {
            a - b
        } else {
            a * b
        })),
        (left, right) => Err(invalid(op, &left, &right, node)),
    }
}

fn divide(left: Value, right: Value, node: NodeRef) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if b.is_zero() {
                return Err(EvalError::new(EvalErrorKind::DivisionByZero, node));
            }
            Ok(Value::Int(a / b))
        }
        (Value::Decimal(a), Value::Decimal(b)) => {
            if b.is_zero() {
                return Err(EvalError::new(EvalErrorKind::DivisionByZero, node));
            }
            let scale = a.fractional_digit_count().max(0);
            let quotient = (&a / &b).with_scale_round(scale, RoundingMode::HalfEven);
            Ok(Value::Decimal(quotient))
        }
        (left, right) => Err(invalid(BinaryOp::Div, &left, &right, node)),
    }
}

fn compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    node: NodeRef,
) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => Err(invalid(op, left, right, node)),
    }
}

fn invalid(op: BinaryOp, left: &Value, right: &Value, node: NodeRef) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeError(format!(
            "invalid operands for `{op}`: {} and {}",
            left.kind_name(),
            right.kind_name()
        )),
        node,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use pretty_assertions::assert_eq;
    use rill_ir::{NodeKind, Span};
    use std::str::FromStr as _;

    fn node() -> NodeRef {
        NodeRef::new(NodeKind::Binary, Span::DUMMY)
    }

    fn dec(text: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn string_concatenation_uses_print_forms() {
        let interner = StringInterner::new();
        let result = apply(
            BinaryOp::Add,
            Value::string("x = "),
            Value::Bool(true),
            &interner,
            node(),
        )
        .unwrap();
        assert_eq!(result, Value::string("x = TRUE"));
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        let interner = StringInterner::new();
        let divide = |a: i32, b: i32| {
            apply(
                BinaryOp::Div,
                Value::Int(a.into()),
                Value::Int(b.into()),
                &interner,
                node(),
            )
            .unwrap()
        };
        assert_eq!(divide(5, 2), Value::Int(2.into()));
        assert_eq!(divide(-5, 2), Value::Int((-2).into()));
    }

    #[test]
    fn decimal_division_rounds_half_even_at_dividend_scale() {
        let interner = StringInterner::new();
        let divide = |a: &str, b: &str| {
            apply(BinaryOp::Div, dec(a), dec(b), &interner, node()).unwrap()
        };
        assert_eq!(divide("5.0", "2.0"), dec("2.5"));
        assert_eq!(divide("1.0", "3.0"), dec("0.3"));
        assert_eq!(divide("0.5", "2.0"), dec("0.2"));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let interner = StringInterner::new();
        let err = apply(
            BinaryOp::Div,
            Value::Int(1.into()),
            Value::Int(0.into()),
            &interner,
            node(),
        )
        .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn equality_never_fails_across_kinds() {
        let interner = StringInterner::new();
        let result = apply(
            BinaryOp::Eq,
            Value::Int(1.into()),
            Value::string("1"),
            &interner,
            node(),
        )
        .unwrap();
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn ordering_requires_matching_kinds() {
        let interner = StringInterner::new();
        let err = apply(
            BinaryOp::Lt,
            Value::Int(1.into()),
            dec("2.0"),
            &interner,
            node(),
        )
        .unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeError(_)));
    }

    #[test]
    fn mixed_numeric_arithmetic_is_an_error() {
        let interner = StringInterner::new();
        let err = apply(
            BinaryOp::Add,
            Value::Int(1.into()),
            dec("2.0"),
            &interner,
            node(),
        )
        .unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeError(_)));
    }
}

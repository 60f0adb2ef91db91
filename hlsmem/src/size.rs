//! Allocation size resolution.
//!
//! The total storage of a stack allocation is the allocated type's size
//! multiplied by the element count. The count operand is an integer literal
//! in the common case; front-ends lowering dynamically shaped locals instead
//! emit a constant expression of a known two-level shape, which
//! [`allocation_bits`] unwraps under an explicit, checked precondition. Any
//! other shape is a named [`SizeError`]; the resolver never guesses a size.
use hlsinstr::{
    consts::{
        AnyConst,
        expr::{ConstExpr, ConstValue},
        int::IConst,
    },
    layout::{DataLayout, LayoutError},
    modules::{
        mem::MAlloca,
        operand::{Name, Operand},
    },
    types::TypeRegistry,
};

use thiserror::Error;

/// Why an allocation's size could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    /// The element count is an SSA register, i.e. only known at runtime.
    #[error("element count is the runtime value {0}, not a constant")]
    RuntimeCount(Name),

    /// The count is a constant expression that does not match the expected
    /// two-level shape.
    #[error("constant-expression count does not match the expected shape: {0}")]
    ConstExprShape(&'static str),

    /// The literal count is negative or does not fit in 64 bits.
    #[error("element count `{0}` is outside the supported range")]
    CountRange(String),

    /// The element type itself has no compile-time size, or the product
    /// overflows.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Total storage the allocation reserves, in bits.
///
/// Pure function of the allocation, the registry its typeref lives in, and
/// the target data layout; the module is never touched.
pub fn allocation_bits(
    alloca: &MAlloca,
    registry: &TypeRegistry,
    layout: &DataLayout,
) -> Result<u64, SizeError> {
    let count = effective_count(&alloca.count)?;
    let element_bits = registry.alloc_bits(layout, alloca.ty)?;
    element_bits
        .checked_mul(count)
        .ok_or(SizeError::Layout(LayoutError::Oversized))
}

/// Number of elements the count operand stands for.
fn effective_count(count: &Operand) -> Result<u64, SizeError> {
    match count {
        Operand::Imm(AnyConst::Int(literal)) => literal_count(literal),
        Operand::Imm(AnyConst::Float(_)) => Err(SizeError::ConstExprShape(
            "count immediate is not an integer",
        )),
        Operand::Reg(name) => Err(SizeError::RuntimeCount(*name)),
        Operand::Expr(expr) => unwrap_expr_count(expr),
    }
}

fn literal_count(literal: &IConst) -> Result<u64, SizeError> {
    literal
        .as_u64()
        .ok_or_else(|| SizeError::CountRange(literal.value.to_string()))
}

/// Recover the literal element count from a lowered count expression.
///
/// The supported shape is two levels deep: the outer expression's first
/// operand must itself be an expression, and that nested expression's
/// second operand must be an integer constant, the element count. This is
/// the shape produced when a front-end scales a literal count by an
/// element-size computation (e.g. a multiply whose first operand is a
/// sizeof-style subexpression carrying the count as its second operand).
/// Every deviation from the shape gets its own diagnostic so producers can
/// tell which precondition broke.
fn unwrap_expr_count(outer: &ConstExpr) -> Result<u64, SizeError> {
    let first = outer
        .operands
        .first()
        .ok_or(SizeError::ConstExprShape("outer expression has no operands"))?;
    let inner = match first {
        ConstValue::Expr(inner) => inner,
        ConstValue::Const(_) => {
            return Err(SizeError::ConstExprShape(
                "first operand of the outer expression is not a nested expression",
            ));
        }
    };
    let second = inner.operands.get(1).ok_or(SizeError::ConstExprShape(
        "nested expression has no second operand",
    ))?;
    match second {
        ConstValue::Const(AnyConst::Int(literal)) => literal_count(literal),
        _ => Err(SizeError::ConstExprShape(
            "second operand of the nested expression is not an integer constant",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsinstr::{
        consts::{
            expr::{ConstExprOp, ConstValue},
            fp::FConst,
        },
        types::primary::{IType, PtrType},
    };

    fn alloca(registry: &TypeRegistry, count: Operand) -> MAlloca {
        MAlloca {
            dest: Name(0),
            ty: registry.search_or_insert(IType::I8.into()),
            count,
            alignment: None,
            annotation: None,
        }
    }

    /// The two-level count shape: `mul(ptrtoint(ptr, N), _)` where `N` is
    /// the element count.
    fn lowered_count(count: u64) -> Operand {
        let inner = ConstExpr::new(
            ConstExprOp::PtrToInt,
            [
                ConstValue::Const(IConst::new(IType::I64, 0u64).into()),
                ConstValue::Const(IConst::new(IType::I64, count).into()),
            ],
        );
        let outer = ConstExpr::new(
            ConstExprOp::Mul,
            [
                ConstValue::from(inner),
                ConstValue::Const(IConst::new(IType::I64, 1u64).into()),
            ],
        );
        Operand::Expr(outer)
    }

    #[test]
    fn literal_counts_multiply_the_element_size() {
        let registry = TypeRegistry::new();
        let layout = DataLayout::default();
        let alloca = alloca(&registry, Operand::literal(32u64));
        assert_eq!(allocation_bits(&alloca, &registry, &layout), Ok(256));
    }

    #[test]
    fn lowered_counts_unwrap_to_the_literal() {
        let registry = TypeRegistry::new();
        let layout = DataLayout::default();
        let alloca = alloca(&registry, lowered_count(128));
        assert_eq!(allocation_bits(&alloca, &registry, &layout), Ok(1024));
    }

    #[test]
    fn runtime_counts_are_rejected() {
        let registry = TypeRegistry::new();
        let layout = DataLayout::default();
        let alloca = alloca(&registry, Operand::Reg(Name(7)));
        assert_eq!(
            allocation_bits(&alloca, &registry, &layout),
            Err(SizeError::RuntimeCount(Name(7)))
        );
    }

    #[test]
    fn each_shape_violation_is_named() {
        // Outer expression without operands.
        let empty = Operand::Expr(ConstExpr::new(ConstExprOp::Mul, []));
        assert!(matches!(
            effective_count(&empty),
            Err(SizeError::ConstExprShape("outer expression has no operands"))
        ));

        // First operand is a plain constant, not a nested expression.
        let flat = Operand::Expr(ConstExpr::new(
            ConstExprOp::Mul,
            [ConstValue::Const(IConst::from(3u32).into())],
        ));
        assert!(matches!(
            effective_count(&flat),
            Err(SizeError::ConstExprShape(
                "first operand of the outer expression is not a nested expression"
            ))
        ));

        // Nested expression too short.
        let short_inner = ConstExpr::new(
            ConstExprOp::PtrToInt,
            [ConstValue::Const(IConst::from(3u32).into())],
        );
        let short = Operand::Expr(ConstExpr::new(
            ConstExprOp::Mul,
            [ConstValue::from(short_inner)],
        ));
        assert!(matches!(
            effective_count(&short),
            Err(SizeError::ConstExprShape(
                "nested expression has no second operand"
            ))
        ));

        // Second operand of the nested expression is not an integer.
        let float_inner = ConstExpr::new(
            ConstExprOp::PtrToInt,
            [
                ConstValue::Const(IConst::from(0u32).into()),
                ConstValue::Const(FConst::try_from(2.0f32).expect("finite").into()),
            ],
        );
        let float = Operand::Expr(ConstExpr::new(
            ConstExprOp::Mul,
            [ConstValue::from(float_inner)],
        ));
        assert!(matches!(
            effective_count(&float),
            Err(SizeError::ConstExprShape(
                "second operand of the nested expression is not an integer constant"
            ))
        ));
    }

    #[test]
    fn negative_counts_are_out_of_range() {
        let negative = Operand::Imm(IConst::new(IType::I32, -4i32).into());
        assert_eq!(
            effective_count(&negative),
            Err(SizeError::CountRange("-4".to_string()))
        );
    }

    #[test]
    fn unsized_element_types_propagate_the_layout_error() {
        use hlsinstr::types::primary::{VcType, VectorSize};

        let registry = TypeRegistry::new();
        let layout = DataLayout::default();
        let scalable = registry.search_or_insert(
            VcType {
                ty: PtrType.into(),
                size: VectorSize::Scalable(4),
            }
            .into(),
        );
        let alloca = MAlloca {
            dest: Name(0),
            ty: scalable,
            count: Operand::literal(1u64),
            alignment: None,
            annotation: None,
        };
        assert!(matches!(
            allocation_bits(&alloca, &registry, &layout),
            Err(SizeError::Layout(LayoutError::Unsized(_)))
        ));
    }
}

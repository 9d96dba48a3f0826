//! Boolean-valued expression trees and their simplification algebra.
//!
//! Structured control constructs read naturally only if their conditions do; this
//! module owns the algebra that turns chains of raw comparisons and inverted jumps
//! back into `a >= b || c != null` style conditions.
//!
//! Negation and De Morgan application are deliberately separate operations:
//! [`ConditionalExpression::get_negated`] wraps (or, for comparisons, inverts)
//! without restructuring, and [`ConditionalExpression::get_demorgan_applied`]
//! pushes a pending negation down through the tree, swapping each combination
//! operator for its dual.
//!
//! Invariant: `get_negated` never produces a NOT wrapper around a comparison
//! (comparisons negate by operator inversion). On trees respecting this, De Morgan
//! application with a pending negation is a structural involution, and application
//! without one is the structural identity.

use std::collections::HashSet;
use std::fmt;

use crate::analysis::ir::expression::{Expression, LiteralValue};
use crate::analysis::ir::lvalue::LValue;
use crate::analysis::ir::operators::{BoolOp, CompOp};
use crate::analysis::ir::output::{Dumper, LValueUsageCollector, LValueUsageSet, PlainDumper, TypeUsageSink};
use crate::analysis::ir::precedence::Precedence;
use crate::analysis::ir::rewrite::{
    CloneHelper, ExpressionRewriter, LValueRewriter, RewriterFlags, StatementContainer,
};
use crate::analysis::ir::ssa::SsaIdentifiers;
use crate::metadata::typesystem::InferredJavaType;

/// The inferred type of every conditional node: boolean, fixed at construction.
static BOOLEAN_INFERRED: InferredJavaType = InferredJavaType::boolean();

/// A boolean-valued subtree.
///
/// Closed sum over the conditional node kinds. Every variant's static type is
/// boolean and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionalExpression {
    /// Atomic comparison of two value operands
    Comparison(ComparisonOperation),
    /// Logical negation wrapper
    Not(NotOperation),
    /// Binary boolean combination
    Boolean(BooleanOperation),
    /// An arbitrary boolean-typed expression used as a condition
    Value(BooleanExpression),
}

impl ConditionalExpression {
    /// Returns the inferred type: always boolean.
    #[must_use]
    pub fn inferred_type(&self) -> &InferredJavaType {
        &BOOLEAN_INFERRED
    }

    /// Returns the layout-cost metric of this subtree.
    ///
    /// The binary combination charges 2 per side for its unconditional parentheses
    /// and operator glyphs.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            ConditionalExpression::Comparison(cmp) => 1 + cmp.lhs.size() + cmp.rhs.size(),
            ConditionalExpression::Not(not) => 1 + not.inner.size(),
            ConditionalExpression::Boolean(op) => 2 + op.lhs.size() + 2 + op.rhs.size(),
            ConditionalExpression::Value(value) => value.inner.size(),
        }
    }

    /// Returns the precedence this node renders at.
    #[must_use]
    pub fn precedence(&self) -> Precedence {
        match self {
            ConditionalExpression::Comparison(cmp) => cmp.op.precedence(),
            ConditionalExpression::Not(_) => Precedence::Unary,
            ConditionalExpression::Boolean(op) => op.op.precedence(),
            ConditionalExpression::Value(value) => value.inner.precedence(),
        }
    }

    /// Emits this subtree into the sink.
    ///
    /// The binary combination renders as `(<lhs>) <op> (<rhs>)` with unconditional
    /// parentheses - correct without a precedence table at this layer; a later
    /// formatting pass may strip the redundant ones.
    pub fn dump(&self, d: &mut dyn Dumper) {
        match self {
            ConditionalExpression::Comparison(cmp) => {
                let prec = cmp.op.precedence();
                cmp.lhs.dump_with_outer_precedence(d, prec);
                d.print(" ");
                d.print(cmp.op.show_as());
                d.print(" ");
                cmp.rhs.dump_with_outer_precedence(d, prec);
            }
            ConditionalExpression::Not(not) => {
                d.print("!");
                not.inner.dump_with_outer_precedence(d, Precedence::Unary);
            }
            ConditionalExpression::Boolean(op) => {
                d.print("(");
                op.lhs.dump(d);
                d.print(") ");
                d.print(op.op.show_as());
                d.print(" (");
                op.rhs.dump(d);
                d.print(")");
            }
            ConditionalExpression::Value(value) => value.inner.dump(d),
        }
    }

    /// Emits this subtree, parenthesizing itself if needed in the given context.
    pub fn dump_with_outer_precedence(&self, d: &mut dyn Dumper, outer: Precedence) {
        if self.precedence().needs_parens_inside(outer) {
            d.print("(");
            self.dump(d);
            d.print(")");
        } else {
            self.dump(d);
        }
    }

    /// Returns the logical negation of this condition.
    ///
    /// Comparisons invert their operator; a NOT wrapping is unwrapped; everything
    /// else is wrapped in a NOT node. De Morgan restructuring is deliberately not
    /// applied here - see [`ConditionalExpression::get_demorgan_applied`].
    #[must_use]
    pub fn get_negated(self) -> ConditionalExpression {
        match self {
            ConditionalExpression::Comparison(mut cmp) => {
                cmp.op = cmp.op.inverse();
                ConditionalExpression::Comparison(cmp)
            }
            ConditionalExpression::Not(not) => *not.inner,
            other => ConditionalExpression::Not(NotOperation::new(other)),
        }
    }

    /// Pushes a pending negation down through the tree.
    ///
    /// When `applying_negation` is set, each binary combination swaps its operator
    /// for the De Morgan dual and propagates the flag to both operands; comparisons
    /// absorb the negation by operator inversion; a NOT wrapper cancels it. When it
    /// is not set the call still recurses, normalizing descendants, but changes no
    /// operator: the result is structurally equal to the input.
    #[must_use]
    pub fn get_demorgan_applied(self, applying_negation: bool) -> ConditionalExpression {
        match self {
            ConditionalExpression::Boolean(mut op) => {
                op.lhs = Box::new(op.lhs.get_demorgan_applied(applying_negation));
                op.rhs = Box::new(op.rhs.get_demorgan_applied(applying_negation));
                if applying_negation {
                    op.op = op.op.demorgan_dual();
                }
                ConditionalExpression::Boolean(op)
            }
            ConditionalExpression::Comparison(mut cmp) => {
                if applying_negation {
                    cmp.op = cmp.op.inverse();
                }
                ConditionalExpression::Comparison(cmp)
            }
            ConditionalExpression::Not(not) => {
                if applying_negation {
                    not.inner.get_demorgan_applied(false)
                } else {
                    ConditionalExpression::Not(NotOperation::new(
                        not.inner.get_demorgan_applied(false),
                    ))
                }
            }
            ConditionalExpression::Value(value) => {
                if applying_negation {
                    ConditionalExpression::Not(NotOperation::new(ConditionalExpression::Value(
                        value,
                    )))
                } else {
                    ConditionalExpression::Value(value)
                }
            }
        }
    }

    /// Re-simplifies this condition using type knowledge.
    ///
    /// Folds double negation and comparisons against boolean constants, including
    /// the int-encoded 0/1 forms bytecode uses for booleans. Safe to call
    /// repeatedly; a fully simplified tree is returned unchanged.
    #[must_use]
    pub fn optimise_for_type(self) -> ConditionalExpression {
        match self {
            ConditionalExpression::Boolean(mut op) => {
                op.lhs = Box::new(op.lhs.optimise_for_type());
                op.rhs = Box::new(op.rhs.optimise_for_type());
                ConditionalExpression::Boolean(op)
            }
            ConditionalExpression::Not(not) => match not.inner.optimise_for_type() {
                ConditionalExpression::Not(inner) => *inner.inner,
                inner => ConditionalExpression::Not(NotOperation::new(inner)),
            },
            ConditionalExpression::Comparison(cmp) => simplify_boolean_comparison(cmp),
            ConditionalExpression::Value(value) => ConditionalExpression::Value(value),
        }
    }

    /// Returns the set of lvalues referenced anywhere in this subtree.
    ///
    /// Union over children, duplicates removed; no ordering guarantee. Used by the
    /// loop-reconstruction pass to decide which variables a candidate loop
    /// condition touches.
    #[must_use]
    pub fn collect_loop_lvalues(&self) -> HashSet<LValue> {
        let mut collector = LValueUsageSet::new();
        self.collect_used_lvalues(&mut collector);
        collector.into_set()
    }

    /// Reports every lvalue mentioned in this subtree, in traversal order.
    pub fn collect_used_lvalues(&self, collector: &mut dyn LValueUsageCollector) {
        match self {
            ConditionalExpression::Comparison(cmp) => {
                cmp.lhs.collect_used_lvalues(collector);
                cmp.rhs.collect_used_lvalues(collector);
            }
            ConditionalExpression::Not(not) => not.inner.collect_used_lvalues(collector),
            ConditionalExpression::Boolean(op) => {
                op.lhs.collect_used_lvalues(collector);
                op.rhs.collect_used_lvalues(collector);
            }
            ConditionalExpression::Value(value) => value.inner.collect_used_lvalues(collector),
        }
    }

    /// Reports every type this subtree directly references.
    pub fn collect_type_usages(&self, sink: &mut TypeUsageSink) {
        sink.collect(self.inferred_type().java_type());
        match self {
            ConditionalExpression::Comparison(cmp) => {
                cmp.lhs.collect_type_usages(sink);
                cmp.rhs.collect_type_usages(sink);
            }
            ConditionalExpression::Not(not) => not.inner.collect_type_usages(sink),
            ConditionalExpression::Boolean(op) => {
                op.lhs.collect_type_usages(sink);
                op.rhs.collect_type_usages(sink);
            }
            ConditionalExpression::Value(value) => value.inner.collect_type_usages(sink),
        }
    }

    /// Single-use substitution protocol; composites recurse and keep their shape.
    #[must_use]
    pub fn replace_single_usage_lvalues(
        self,
        rewriter: &mut dyn LValueRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
    ) -> ConditionalExpression {
        match self {
            ConditionalExpression::Comparison(mut cmp) => {
                cmp.lhs = Box::new(cmp.lhs.replace_single_usage_lvalues(rewriter, ssa, container));
                cmp.rhs = Box::new(cmp.rhs.replace_single_usage_lvalues(rewriter, ssa, container));
                ConditionalExpression::Comparison(cmp)
            }
            ConditionalExpression::Not(mut not) => {
                not.inner =
                    Box::new(not.inner.replace_single_usage_lvalues(rewriter, ssa, container));
                ConditionalExpression::Not(not)
            }
            ConditionalExpression::Boolean(mut op) => {
                op.lhs = Box::new(op.lhs.replace_single_usage_lvalues(rewriter, ssa, container));
                op.rhs = Box::new(op.rhs.replace_single_usage_lvalues(rewriter, ssa, container));
                ConditionalExpression::Boolean(op)
            }
            ConditionalExpression::Value(mut value) => {
                value.inner =
                    Box::new(value.inner.replace_single_usage_lvalues(rewriter, ssa, container));
                ConditionalExpression::Value(value)
            }
        }
    }

    /// Generic rewrite protocol: applies the policy to every direct child.
    #[must_use]
    pub fn apply_expression_rewriter(
        self,
        rewriter: &mut dyn ExpressionRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> ConditionalExpression {
        match self {
            ConditionalExpression::Comparison(mut cmp) => {
                cmp.lhs = Box::new(rewriter.rewrite_expression(*cmp.lhs, ssa, container, flags));
                cmp.rhs = Box::new(rewriter.rewrite_expression(*cmp.rhs, ssa, container, flags));
                ConditionalExpression::Comparison(cmp)
            }
            ConditionalExpression::Not(mut not) => {
                not.inner =
                    Box::new(rewriter.rewrite_conditional(*not.inner, ssa, container, flags));
                ConditionalExpression::Not(not)
            }
            ConditionalExpression::Boolean(mut op) => {
                op.lhs = Box::new(rewriter.rewrite_conditional(*op.lhs, ssa, container, flags));
                op.rhs = Box::new(rewriter.rewrite_conditional(*op.rhs, ssa, container, flags));
                ConditionalExpression::Boolean(op)
            }
            ConditionalExpression::Value(mut value) => {
                value.inner =
                    Box::new(rewriter.rewrite_expression(*value.inner, ssa, container, flags));
                ConditionalExpression::Value(value)
            }
        }
    }

    /// Deep clone with the helper's substitution policy.
    #[must_use]
    pub fn deep_clone(&self, helper: &CloneHelper) -> ConditionalExpression {
        match self {
            ConditionalExpression::Comparison(cmp) => {
                ConditionalExpression::Comparison(ComparisonOperation {
                    op: cmp.op,
                    lhs: Box::new(cmp.lhs.deep_clone(helper)),
                    rhs: Box::new(cmp.rhs.deep_clone(helper)),
                })
            }
            ConditionalExpression::Not(not) => ConditionalExpression::Not(NotOperation {
                inner: Box::new(not.inner.deep_clone(helper)),
            }),
            ConditionalExpression::Boolean(op) => {
                ConditionalExpression::Boolean(BooleanOperation {
                    op: op.op,
                    lhs: Box::new(op.lhs.deep_clone(helper)),
                    rhs: Box::new(op.rhs.deep_clone(helper)),
                })
            }
            ConditionalExpression::Value(value) => {
                ConditionalExpression::Value(BooleanExpression {
                    inner: Box::new(value.inner.deep_clone(helper)),
                })
            }
        }
    }
}

impl fmt::Display for ConditionalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dumper = PlainDumper::new();
        self.dump(&mut dumper);
        write!(f, "{}", dumper.finish())
    }
}

/// Simplifies a comparison against a boolean constant, if it is one.
///
/// `x == true` becomes `x`, `x != true` its negation, and symmetrically for
/// `false`; int literals 0/1 compared against a boolean-typed operand count as the
/// boolean constants bytecode encodes them as. Anything else is returned unchanged.
fn simplify_boolean_comparison(cmp: ComparisonOperation) -> ConditionalExpression {
    if !matches!(cmp.op, CompOp::Eq | CompOp::Ne) {
        return ConditionalExpression::Comparison(cmp);
    }

    let ComparisonOperation { op, lhs, rhs } = cmp;
    let (value, truth) = match (boolean_constant(&lhs, &rhs), boolean_constant(&rhs, &lhs)) {
        (Some(truth), _) => (rhs, truth),
        (None, Some(truth)) => (lhs, truth),
        (None, None) => {
            return ConditionalExpression::Comparison(ComparisonOperation { op, lhs, rhs })
        }
    };

    let condition = match *value {
        Expression::Conditional(conditional) => conditional,
        other => ConditionalExpression::Value(BooleanExpression::new(other)),
    };
    if truth == (op == CompOp::Eq) {
        condition
    } else {
        condition.get_negated()
    }
}

/// Returns the boolean truth value of `candidate` when it is a boolean constant
/// (or an int-encoded one and `other` is boolean-typed).
fn boolean_constant(candidate: &Expression, other: &Expression) -> Option<bool> {
    let Expression::Literal(literal) = candidate else {
        return None;
    };
    match literal.value() {
        LiteralValue::Boolean(value) => Some(*value),
        LiteralValue::Int(0) if other.inferred_type().java_type().is_boolean() => Some(false),
        LiteralValue::Int(1) if other.inferred_type().java_type().is_boolean() => Some(true),
        _ => None,
    }
}

/// Atomic comparison of two value operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonOperation {
    pub(crate) op: CompOp,
    pub(crate) lhs: Box<Expression>,
    pub(crate) rhs: Box<Expression>,
}

impl ComparisonOperation {
    /// Creates a comparison.
    #[must_use]
    pub fn new(lhs: Expression, rhs: Expression, op: CompOp) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Returns the comparison operator.
    #[must_use]
    pub const fn op(&self) -> CompOp {
        self.op
    }
}

impl From<ComparisonOperation> for ConditionalExpression {
    fn from(cmp: ComparisonOperation) -> Self {
        ConditionalExpression::Comparison(cmp)
    }
}

/// Logical negation wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotOperation {
    pub(crate) inner: Box<ConditionalExpression>,
}

impl NotOperation {
    /// Wraps a condition in a logical NOT.
    #[must_use]
    pub fn new(inner: ConditionalExpression) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Returns the negated condition.
    #[must_use]
    pub const fn inner(&self) -> &ConditionalExpression {
        &self.inner
    }
}

impl From<NotOperation> for ConditionalExpression {
    fn from(not: NotOperation) -> Self {
        ConditionalExpression::Not(not)
    }
}

/// Binary boolean combination.
///
/// Constructed from two conditional operands and an operator; its inferred type is
/// boolean at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BooleanOperation {
    pub(crate) op: BoolOp,
    pub(crate) lhs: Box<ConditionalExpression>,
    pub(crate) rhs: Box<ConditionalExpression>,
}

impl BooleanOperation {
    /// Creates a combination of two conditions.
    #[must_use]
    pub fn new(lhs: ConditionalExpression, rhs: ConditionalExpression, op: BoolOp) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Returns the combination operator.
    #[must_use]
    pub const fn op(&self) -> BoolOp {
        self.op
    }

    /// Returns the left operand.
    #[must_use]
    pub const fn lhs(&self) -> &ConditionalExpression {
        &self.lhs
    }

    /// Returns the right operand.
    #[must_use]
    pub const fn rhs(&self) -> &ConditionalExpression {
        &self.rhs
    }
}

impl From<BooleanOperation> for ConditionalExpression {
    fn from(op: BooleanOperation) -> Self {
        ConditionalExpression::Boolean(op)
    }
}

/// An arbitrary boolean-typed expression used as a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BooleanExpression {
    pub(crate) inner: Box<Expression>,
}

impl BooleanExpression {
    /// Wraps a boolean-typed expression.
    #[must_use]
    pub fn new(inner: Expression) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Returns the wrapped expression.
    #[must_use]
    pub const fn inner(&self) -> &Expression {
        &self.inner
    }
}

impl From<BooleanExpression> for ConditionalExpression {
    fn from(value: BooleanExpression) -> Self {
        ConditionalExpression::Value(value)
    }
}

//! Expression nodes.
//!
//! [`Expression`] is the closed sum over every computed-value node kind. A node's
//! kind never changes after construction; rewriting passes replace children (or the
//! node itself, through the owned-in/owned-out protocols) but never morph a node in
//! place. The `size` metric is always recomputed from children, never cached, so it
//! can never go stale under rewriting.
//!
//! Boolean-valued trees live in [`crate::analysis::ir::conditional`]; assignable
//! storage locations in [`crate::analysis::ir::lvalue`].

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::analysis::ir::conditional::ConditionalExpression;
use crate::analysis::ir::lvalue::LValue;
use crate::analysis::ir::operators::{ArithOp, UnaryArithOp};
use crate::analysis::ir::output::{Dumper, LValueUsageCollector, PlainDumper, TypeUsageSink};
use crate::analysis::ir::precedence::Precedence;
use crate::analysis::ir::rewrite::{
    CloneHelper, ExpressionRewriter, LValueRewriter, RewriterFlags, StatementContainer,
};
use crate::analysis::ir::ssa::SsaIdentifiers;
use crate::metadata::typesystem::{ClassName, InferredJavaType, JavaType, TypeSource};

/// A computed value.
///
/// Closed sum over every expression node kind; all contracts dispatch by exhaustive
/// match, so a newly added kind cannot be silently mishandled anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A typed constant
    Literal(LiteralExpression),
    /// A read of an lvalue; the only node single-use substitution may replace
    LValue(LValueExpression),
    /// Binary arithmetic or bitwise operation
    Arithmetic(ArithmeticOperation),
    /// Unary arithmetic operation
    ArithmeticUnary(ArithmeticMonOperation),
    /// Array element access
    ArrayIndex(ArrayIndexExpression),
    /// Explicit cast to the node's inferred type
    Cast(CastExpression),
    /// Conditional value selection `cond ? lhs : rhs`
    Ternary(TernaryExpression),
    /// A boolean-valued subtree
    Conditional(ConditionalExpression),
}

impl Expression {
    /// Creates a read of the given lvalue.
    #[must_use]
    pub fn lvalue_read(lvalue: LValue) -> Expression {
        Expression::LValue(LValueExpression::new(lvalue))
    }

    /// Creates an `int` literal.
    #[must_use]
    pub fn int_literal(value: i32) -> Expression {
        Expression::Literal(LiteralExpression::new(LiteralValue::Int(value)))
    }

    /// Creates a `boolean` literal.
    #[must_use]
    pub fn boolean_literal(value: bool) -> Expression {
        Expression::Literal(LiteralExpression::new(LiteralValue::Boolean(value)))
    }

    /// Returns the currently-believed static type of this node.
    #[must_use]
    pub fn inferred_type(&self) -> &InferredJavaType {
        match self {
            Expression::Literal(literal) => &literal.inferred,
            Expression::LValue(read) => read.lvalue.inferred_type(),
            Expression::Arithmetic(op) => &op.inferred,
            Expression::ArithmeticUnary(op) => &op.inferred,
            Expression::ArrayIndex(index) => &index.inferred,
            Expression::Cast(cast) => &cast.inferred,
            Expression::Ternary(ternary) => &ternary.inferred,
            Expression::Conditional(conditional) => conditional.inferred_type(),
        }
    }

    /// Returns the layout-cost metric of this subtree.
    ///
    /// Always the node's own token cost plus the recursive sizes of its children;
    /// a display heuristic for downstream line wrapping, not a correctness input.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Expression::Literal(_) => 1,
            Expression::LValue(read) => read.lvalue.size(),
            Expression::Arithmetic(op) => 1 + op.lhs.size() + op.rhs.size(),
            Expression::ArithmeticUnary(op) => 1 + op.operand.size(),
            Expression::ArrayIndex(index) => 2 + index.array.size() + index.index.size(),
            Expression::Cast(cast) => 1 + cast.operand.size(),
            Expression::Ternary(ternary) => {
                3 + ternary.condition.size() + ternary.lhs.size() + ternary.rhs.size()
            }
            Expression::Conditional(conditional) => conditional.size(),
        }
    }

    /// Returns the precedence this node renders at.
    #[must_use]
    pub fn precedence(&self) -> Precedence {
        match self {
            Expression::Literal(_) => Precedence::Strongest,
            Expression::LValue(read) => read.lvalue.precedence(),
            Expression::Arithmetic(op) => op.op.precedence(),
            Expression::ArithmeticUnary(_) => Precedence::Unary,
            Expression::ArrayIndex(_) => Precedence::ParenSubMember,
            Expression::Cast(_) => Precedence::Unary,
            Expression::Ternary(_) => Precedence::Ternary,
            Expression::Conditional(conditional) => conditional.precedence(),
        }
    }

    /// Emits this subtree into the sink.
    pub fn dump(&self, d: &mut dyn Dumper) {
        match self {
            Expression::Literal(literal) => d.print(&literal.value.to_string()),
            Expression::LValue(read) => read.lvalue.dump(d),
            Expression::Arithmetic(op) => {
                let prec = op.op.precedence();
                op.lhs.dump_with_outer_precedence(d, prec);
                d.print(" ");
                d.print(op.op.show_as());
                d.print(" ");
                op.rhs.dump_with_outer_precedence(d, prec);
            }
            Expression::ArithmeticUnary(op) => {
                d.print(op.op.show_as());
                op.operand.dump_with_outer_precedence(d, Precedence::Unary);
            }
            Expression::ArrayIndex(index) => {
                index
                    .array
                    .dump_with_outer_precedence(d, Precedence::ParenSubMember);
                d.print("[");
                index.index.dump_with_outer_precedence(d, Precedence::Weakest);
                d.print("]");
            }
            Expression::Cast(cast) => {
                d.print("(");
                d.print(&cast.inferred.java_type().to_string());
                d.print(")");
                cast.operand.dump_with_outer_precedence(d, Precedence::Unary);
            }
            Expression::Ternary(ternary) => {
                ternary
                    .condition
                    .dump_with_outer_precedence(d, Precedence::Ternary);
                d.print(" ? ");
                ternary.lhs.dump_with_outer_precedence(d, Precedence::Ternary);
                d.print(" : ");
                ternary.rhs.dump_with_outer_precedence(d, Precedence::Ternary);
            }
            Expression::Conditional(conditional) => conditional.dump(d),
        }
    }

    /// Emits this subtree, parenthesizing itself if its own precedence is weaker
    /// than the context passed down by the parent.
    pub fn dump_with_outer_precedence(&self, d: &mut dyn Dumper, outer: Precedence) {
        if self.precedence().needs_parens_inside(outer) {
            d.print("(");
            self.dump(d);
            d.print(")");
        } else {
            self.dump(d);
        }
    }

    /// Reports every lvalue mentioned in this subtree, in traversal order.
    pub fn collect_used_lvalues(&self, collector: &mut dyn LValueUsageCollector) {
        match self {
            Expression::Literal(_) => {}
            Expression::LValue(read) => {
                collector.collect(&read.lvalue);
                read.lvalue.collect_inner_lvalues(collector);
            }
            Expression::Arithmetic(op) => {
                op.lhs.collect_used_lvalues(collector);
                op.rhs.collect_used_lvalues(collector);
            }
            Expression::ArithmeticUnary(op) => op.operand.collect_used_lvalues(collector),
            Expression::ArrayIndex(index) => {
                index.array.collect_used_lvalues(collector);
                index.index.collect_used_lvalues(collector);
            }
            Expression::Cast(cast) => cast.operand.collect_used_lvalues(collector),
            Expression::Ternary(ternary) => {
                ternary.condition.collect_used_lvalues(collector);
                ternary.lhs.collect_used_lvalues(collector);
                ternary.rhs.collect_used_lvalues(collector);
            }
            Expression::Conditional(conditional) => conditional.collect_used_lvalues(collector),
        }
    }

    /// Reports every type this subtree directly references.
    pub fn collect_type_usages(&self, sink: &mut TypeUsageSink) {
        sink.collect(self.inferred_type().java_type());
        match self {
            Expression::Literal(_) => {}
            Expression::LValue(read) => read.lvalue.collect_type_usages(sink),
            Expression::Arithmetic(op) => {
                op.lhs.collect_type_usages(sink);
                op.rhs.collect_type_usages(sink);
            }
            Expression::ArithmeticUnary(op) => op.operand.collect_type_usages(sink),
            Expression::ArrayIndex(index) => {
                index.array.collect_type_usages(sink);
                index.index.collect_type_usages(sink);
            }
            Expression::Cast(cast) => cast.operand.collect_type_usages(sink),
            Expression::Ternary(ternary) => {
                ternary.condition.collect_type_usages(sink);
                ternary.lhs.collect_type_usages(sink);
                ternary.rhs.collect_type_usages(sink);
            }
            Expression::Conditional(conditional) => conditional.collect_type_usages(sink),
        }
    }

    /// Single-use substitution protocol.
    ///
    /// Only a leaf lvalue read may be replaced; every composite recurses into its
    /// children in declaration order and returns itself unchanged in shape.
    #[must_use]
    pub fn replace_single_usage_lvalues(
        self,
        rewriter: &mut dyn LValueRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
    ) -> Expression {
        match self {
            Expression::Literal(literal) => Expression::Literal(literal),
            Expression::LValue(read) => read.replace_single_usage_lvalues(rewriter, ssa, container),
            Expression::Arithmetic(mut op) => {
                op.lhs = Box::new(op.lhs.replace_single_usage_lvalues(rewriter, ssa, container));
                op.rhs = Box::new(op.rhs.replace_single_usage_lvalues(rewriter, ssa, container));
                Expression::Arithmetic(op)
            }
            Expression::ArithmeticUnary(mut op) => {
                op.operand =
                    Box::new(op.operand.replace_single_usage_lvalues(rewriter, ssa, container));
                Expression::ArithmeticUnary(op)
            }
            Expression::ArrayIndex(mut index) => {
                index.array =
                    Box::new(index.array.replace_single_usage_lvalues(rewriter, ssa, container));
                index.index =
                    Box::new(index.index.replace_single_usage_lvalues(rewriter, ssa, container));
                Expression::ArrayIndex(index)
            }
            Expression::Cast(mut cast) => {
                cast.operand =
                    Box::new(cast.operand.replace_single_usage_lvalues(rewriter, ssa, container));
                Expression::Cast(cast)
            }
            Expression::Ternary(mut ternary) => {
                ternary.condition = Box::new(
                    ternary
                        .condition
                        .replace_single_usage_lvalues(rewriter, ssa, container),
                );
                ternary.lhs =
                    Box::new(ternary.lhs.replace_single_usage_lvalues(rewriter, ssa, container));
                ternary.rhs =
                    Box::new(ternary.rhs.replace_single_usage_lvalues(rewriter, ssa, container));
                Expression::Ternary(ternary)
            }
            Expression::Conditional(conditional) => Expression::Conditional(
                conditional.replace_single_usage_lvalues(rewriter, ssa, container),
            ),
        }
    }

    /// Generic rewrite protocol: applies the policy to every direct child and
    /// writes back the result. Unlike single-use substitution, the policy may
    /// replace any child, composite or leaf.
    #[must_use]
    pub fn apply_expression_rewriter(
        self,
        rewriter: &mut dyn ExpressionRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> Expression {
        match self {
            Expression::Literal(literal) => Expression::Literal(literal),
            Expression::LValue(mut read) => {
                // interior first, then the policy's lvalue hook on the result
                let rewritten = read
                    .lvalue
                    .apply_expression_rewriter(rewriter, ssa, container, flags);
                read.lvalue = rewriter.rewrite_lvalue(rewritten, ssa, container, flags);
                Expression::LValue(read)
            }
            Expression::Arithmetic(mut op) => {
                op.lhs = Box::new(rewriter.rewrite_expression(*op.lhs, ssa, container, flags));
                op.rhs = Box::new(rewriter.rewrite_expression(*op.rhs, ssa, container, flags));
                Expression::Arithmetic(op)
            }
            Expression::ArithmeticUnary(mut op) => {
                op.operand =
                    Box::new(rewriter.rewrite_expression(*op.operand, ssa, container, flags));
                Expression::ArithmeticUnary(op)
            }
            Expression::ArrayIndex(mut index) => {
                index.array =
                    Box::new(rewriter.rewrite_expression(*index.array, ssa, container, flags));
                index.index =
                    Box::new(rewriter.rewrite_expression(*index.index, ssa, container, flags));
                Expression::ArrayIndex(index)
            }
            Expression::Cast(mut cast) => {
                cast.operand =
                    Box::new(rewriter.rewrite_expression(*cast.operand, ssa, container, flags));
                Expression::Cast(cast)
            }
            Expression::Ternary(mut ternary) => {
                ternary.condition = Box::new(rewriter.rewrite_conditional(
                    *ternary.condition,
                    ssa,
                    container,
                    flags,
                ));
                ternary.lhs =
                    Box::new(rewriter.rewrite_expression(*ternary.lhs, ssa, container, flags));
                ternary.rhs =
                    Box::new(rewriter.rewrite_expression(*ternary.rhs, ssa, container, flags));
                Expression::Ternary(ternary)
            }
            Expression::Conditional(conditional) => Expression::Conditional(
                conditional.apply_expression_rewriter(rewriter, ssa, container, flags),
            ),
        }
    }

    /// Deep clone with the helper's substitution policy.
    #[must_use]
    pub fn deep_clone(&self, helper: &CloneHelper) -> Expression {
        helper.replace_or_clone(self)
    }

    /// Clones this node, recursing into children through the helper.
    ///
    /// Called by [`CloneHelper::replace_or_clone`] after this node itself failed
    /// the replacement match; not normally called directly.
    #[must_use]
    pub fn deep_clone_children(&self, helper: &CloneHelper) -> Expression {
        match self {
            Expression::Literal(literal) => Expression::Literal(literal.clone()),
            Expression::LValue(read) => Expression::LValue(LValueExpression::new(
                read.lvalue.deep_clone(helper),
            )),
            Expression::Arithmetic(op) => Expression::Arithmetic(ArithmeticOperation {
                op: op.op,
                lhs: Box::new(op.lhs.deep_clone(helper)),
                rhs: Box::new(op.rhs.deep_clone(helper)),
                inferred: op.inferred.clone(),
            }),
            Expression::ArithmeticUnary(op) => {
                Expression::ArithmeticUnary(ArithmeticMonOperation {
                    op: op.op,
                    operand: Box::new(op.operand.deep_clone(helper)),
                    inferred: op.inferred.clone(),
                })
            }
            Expression::ArrayIndex(index) => Expression::ArrayIndex(ArrayIndexExpression {
                array: Box::new(index.array.deep_clone(helper)),
                index: Box::new(index.index.deep_clone(helper)),
                inferred: index.inferred.clone(),
            }),
            Expression::Cast(cast) => Expression::Cast(CastExpression {
                operand: Box::new(cast.operand.deep_clone(helper)),
                inferred: cast.inferred.clone(),
            }),
            Expression::Ternary(ternary) => Expression::Ternary(TernaryExpression {
                condition: Box::new(ternary.condition.deep_clone(helper)),
                lhs: Box::new(ternary.lhs.deep_clone(helper)),
                rhs: Box::new(ternary.rhs.deep_clone(helper)),
                inferred: ternary.inferred.clone(),
            }),
            Expression::Conditional(conditional) => {
                Expression::Conditional(conditional.deep_clone(helper))
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dumper = PlainDumper::new();
        self.dump(&mut dumper);
        write!(f, "{}", dumper.finish())
    }
}

impl From<ConditionalExpression> for Expression {
    fn from(conditional: ConditionalExpression) -> Self {
        Expression::Conditional(conditional)
    }
}

/// A typed constant value.
///
/// Floating-point equality and hashing use the bit pattern, so literals are lawful
/// `Eq`/`Hash` members of lvalue/expression sets.
#[derive(Debug, Clone)]
pub enum LiteralValue {
    /// The `null` reference
    Null,
    /// A `boolean` constant
    Boolean(bool),
    /// An `int` constant (also covers the smaller integral kinds after lifting)
    Int(i32),
    /// A `long` constant
    Long(i64),
    /// A `float` constant
    Float(f32),
    /// A `double` constant
    Double(f64),
    /// A `java.lang.String` constant
    String(String),
}

impl LiteralValue {
    /// Returns the erased type this constant has on its own.
    #[must_use]
    pub fn natural_type(&self) -> JavaType {
        match self {
            LiteralValue::Null => JavaType::Reference(ClassName::from_binary("java/lang/Object")),
            LiteralValue::Boolean(_) => JavaType::Boolean,
            LiteralValue::Int(_) => JavaType::Int,
            LiteralValue::Long(_) => JavaType::Long,
            LiteralValue::Float(_) => JavaType::Float,
            LiteralValue::Double(_) => JavaType::Double,
            LiteralValue::String(_) => {
                JavaType::Reference(ClassName::from_binary("java/lang/String"))
            }
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::Null, LiteralValue::Null) => true,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Int(a), LiteralValue::Int(b)) => a == b,
            (LiteralValue::Long(a), LiteralValue::Long(b)) => a == b,
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::Null => {}
            LiteralValue::Boolean(value) => value.hash(state),
            LiteralValue::Int(value) => value.hash(state),
            LiteralValue::Long(value) => value.hash(state),
            LiteralValue::Float(value) => value.to_bits().hash(state),
            LiteralValue::Double(value) => value.to_bits().hash(state),
            LiteralValue::String(value) => value.hash(state),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Boolean(value) => write!(f, "{value}"),
            LiteralValue::Int(value) => write!(f, "{value}"),
            LiteralValue::Long(value) => write!(f, "{value}L"),
            LiteralValue::Float(value) => write!(f, "{value}f"),
            LiteralValue::Double(value) => write!(f, "{value}"),
            LiteralValue::String(value) => write!(f, "\"{}\"", value.escape_default()),
        }
    }
}

/// A constant leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralExpression {
    pub(crate) value: LiteralValue,
    pub(crate) inferred: InferredJavaType,
}

impl LiteralExpression {
    /// Creates a literal; its inferred type is the constant's natural type with
    /// literal provenance.
    #[must_use]
    pub fn new(value: LiteralValue) -> Self {
        let inferred = InferredJavaType::new(value.natural_type(), TypeSource::Literal);
        Self { value, inferred }
    }

    /// Returns the constant value.
    #[must_use]
    pub const fn value(&self) -> &LiteralValue {
        &self.value
    }
}

/// A read of an lvalue, lifting storage into expression space.
///
/// This is the leaf the single-use substitution protocol targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LValueExpression {
    pub(crate) lvalue: LValue,
}

impl LValueExpression {
    /// Creates a read of the given lvalue.
    #[must_use]
    pub const fn new(lvalue: LValue) -> Self {
        Self { lvalue }
    }

    /// Returns the lvalue being read.
    #[must_use]
    pub const fn lvalue(&self) -> &LValue {
        &self.lvalue
    }

    fn replace_single_usage_lvalues(
        self,
        rewriter: &mut dyn LValueRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
    ) -> Expression {
        if let Some(replacement) = rewriter.get_replacement(&self.lvalue, ssa, container) {
            return replacement;
        }
        Expression::LValue(LValueExpression::new(
            self.lvalue
                .replace_single_usage_lvalues(rewriter, ssa, container),
        ))
    }
}

/// Binary arithmetic or bitwise operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArithmeticOperation {
    pub(crate) op: ArithOp,
    pub(crate) lhs: Box<Expression>,
    pub(crate) rhs: Box<Expression>,
    pub(crate) inferred: InferredJavaType,
}

impl ArithmeticOperation {
    /// Creates a binary operation; the result type follows the left operand with
    /// operation provenance.
    #[must_use]
    pub fn new(lhs: Expression, rhs: Expression, op: ArithOp) -> Self {
        let inferred = InferredJavaType::new(
            lhs.inferred_type().java_type().clone(),
            TypeSource::Operation,
        );
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            inferred,
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> ArithOp {
        self.op
    }
}

/// Unary arithmetic operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArithmeticMonOperation {
    pub(crate) op: UnaryArithOp,
    pub(crate) operand: Box<Expression>,
    pub(crate) inferred: InferredJavaType,
}

impl ArithmeticMonOperation {
    /// Creates a unary operation typed after its operand.
    #[must_use]
    pub fn new(operand: Expression, op: UnaryArithOp) -> Self {
        let inferred = InferredJavaType::new(
            operand.inferred_type().java_type().clone(),
            TypeSource::Operation,
        );
        Self {
            op,
            operand: Box::new(operand),
            inferred,
        }
    }
}

/// Array element access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayIndexExpression {
    pub(crate) array: Box<Expression>,
    pub(crate) index: Box<Expression>,
    pub(crate) inferred: InferredJavaType,
}

impl ArrayIndexExpression {
    /// Creates an element access; the result type is the array's element type when
    /// the array operand is known to be an array.
    #[must_use]
    pub fn new(array: Expression, index: Expression) -> Self {
        let inferred = match array.inferred_type().java_type() {
            JavaType::Array(element) => {
                InferredJavaType::new((**element).clone(), TypeSource::Expression)
            }
            other => InferredJavaType::new(other.clone(), TypeSource::Expression),
        };
        Self {
            array: Box::new(array),
            index: Box::new(index),
            inferred,
        }
    }
}

/// Explicit cast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CastExpression {
    pub(crate) operand: Box<Expression>,
    pub(crate) inferred: InferredJavaType,
}

impl CastExpression {
    /// Creates a cast of `operand` to the given target type.
    #[must_use]
    pub fn new(operand: Expression, target: InferredJavaType) -> Self {
        Self {
            operand: Box::new(operand),
            inferred: target,
        }
    }
}

/// Conditional value selection `cond ? lhs : rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TernaryExpression {
    pub(crate) condition: Box<ConditionalExpression>,
    pub(crate) lhs: Box<Expression>,
    pub(crate) rhs: Box<Expression>,
    pub(crate) inferred: InferredJavaType,
}

impl TernaryExpression {
    /// Creates a ternary typed after its true branch.
    #[must_use]
    pub fn new(condition: ConditionalExpression, lhs: Expression, rhs: Expression) -> Self {
        let inferred = InferredJavaType::new(
            lhs.inferred_type().java_type().clone(),
            TypeSource::Expression,
        );
        Self {
            condition: Box::new(condition),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            inferred,
        }
    }
}

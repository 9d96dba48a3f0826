//! The expression-level intermediate representation.
//!
//! Lifted bytecode becomes a tree of [`Expression`] nodes over assignable
//! [`LValue`] locations, with boolean-valued subtrees held apart as
//! [`ConditionalExpression`] so the simplification algebra (negation, De Morgan
//! application, boolean-constant folding) stays total over a closed set of node
//! kinds. Traversal contracts - size metrics, lvalue/type usage collection,
//! single-use substitution and the generic rewrite protocol - are implemented
//! uniformly across all three node families.

pub mod conditional;
pub mod expression;
pub mod lvalue;
pub mod operators;
pub mod output;
pub mod precedence;
pub mod rewrite;
pub mod ssa;

pub use conditional::{
    BooleanExpression, BooleanOperation, ComparisonOperation, ConditionalExpression, NotOperation,
};
pub use expression::{
    ArithmeticMonOperation, ArithmeticOperation, ArrayIndexExpression, CastExpression, Expression,
    LValueExpression, LiteralExpression, LiteralValue, TernaryExpression,
};
pub use lvalue::{FieldBinding, FieldVariable, LValue, LocalVariable};
pub use operators::{ArithOp, BoolOp, CompOp, UnaryArithOp};
pub use output::{Dumper, LValueUsageCollector, LValueUsageSet, PlainDumper, TypeUsageSink};
pub use precedence::Precedence;
pub use rewrite::{
    CloneHelper, ExpressionRewriter, LValueRewriter, RewriterFlags, StatementContainer,
};
pub use ssa::{
    DefinitionTable, SingleUseRewriter, SsaIdentifierFactory, SsaIdentifiers, SsaVersion,
};

//! Generic rewriting protocols.
//!
//! Two orthogonal traversal contracts every IR node supports:
//!
//! 1. **Single-use substitution** ([`LValueRewriter`]): replaces leaf reads of
//!    lvalues that have exactly one use with the defining expression. Composite
//!    nodes never rewrite themselves wholesale - they recurse and return themselves
//!    unchanged in shape. The asymmetry is designed: the substitution target is
//!    always a leaf variable reference.
//! 2. **Generic rewrite** ([`ExpressionRewriter`]): an arbitrary policy applied to
//!    every direct child, free to replace composites and leaves alike.
//!
//! Both operate on owned nodes (take and return), so replacement is a move rather
//! than mutation of a shared graph; the caller must treat the returned node as the
//! authoritative result for the call site.
//!
//! [`CloneHelper`] supports the third contract: deep-copying a subtree with an
//! injected replacement policy, for when one logical expression must appear at two
//! places in the output without aliasing.

use std::fmt;

use bitflags::bitflags;

use crate::analysis::ir::conditional::{BooleanExpression, ConditionalExpression};
use crate::analysis::ir::expression::Expression;
use crate::analysis::ir::lvalue::LValue;
use crate::analysis::ir::ssa::SsaIdentifiers;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Context flags passed through a generic rewrite traversal
    pub struct RewriterFlags: u8 {
        /// The child being rewritten is read as a value
        const RVALUE = 0x01;
        /// The child being rewritten is the target of an assignment
        const LVALUE = 0x02;
    }
}

/// Enclosing-statement context of a rewrite, opaque to the IR.
///
/// The statement layer itself is outside this crate; nodes only ever carry the
/// context through to the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementContainer {
    unit: String,
    index: usize,
}

impl StatementContainer {
    /// Creates a context naming the decompilation unit and the statement index
    /// within it.
    #[must_use]
    pub fn new(unit: &str, index: usize) -> Self {
        Self {
            unit: unit.to_string(),
            index,
        }
    }

    /// Returns the decompilation unit name.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the statement index within the unit.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for StatementContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.unit, self.index)
    }
}

/// Substitution policy for single-use inlining.
///
/// Consulted at every leaf lvalue read. Returning `Some` replaces the read with the
/// given expression; returning `None` leaves the read in place.
pub trait LValueRewriter {
    /// Returns the replacement for a read of `lvalue` at the given program point,
    /// or `None` when the lvalue does not have exactly one use there.
    fn get_replacement(
        &mut self,
        lvalue: &LValue,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
    ) -> Option<Expression>;
}

/// Arbitrary traversal policy for the generic rewrite protocol.
///
/// Implementors provide `rewrite_expression`; the conditional hook defaults to
/// routing through it and the lvalue hook defaults to the identity, which suits
/// policies that do not distinguish the three node families.
pub trait ExpressionRewriter {
    /// Applies the policy to one expression, returning the authoritative result.
    fn rewrite_expression(
        &mut self,
        expression: Expression,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> Expression;

    /// Applies the policy to a boolean-valued node.
    ///
    /// The default lifts the conditional into expression space, applies
    /// [`ExpressionRewriter::rewrite_expression`], and re-wraps a non-conditional
    /// result as an opaque boolean expression.
    fn rewrite_conditional(
        &mut self,
        conditional: ConditionalExpression,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> ConditionalExpression {
        match self.rewrite_expression(Expression::Conditional(conditional), ssa, container, flags)
        {
            Expression::Conditional(conditional) => conditional,
            other => BooleanExpression::new(other).into(),
        }
    }

    /// Applies the policy to an lvalue after its nested expressions were rewritten.
    /// The default leaves it unchanged.
    fn rewrite_lvalue(
        &mut self,
        lvalue: LValue,
        _ssa: &SsaIdentifiers,
        _container: &StatementContainer,
        _flags: RewriterFlags,
    ) -> LValue {
        lvalue
    }
}

/// Deep-copy policy: replace matching subtrees, clone everything else.
///
/// Replacement matching is structural. An empty helper is a plain deep clone.
#[derive(Debug, Default)]
pub struct CloneHelper {
    replacements: Vec<(Expression, Expression)>,
}

impl CloneHelper {
    /// Creates a helper with no replacements (plain deep clone).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a replacement pair: any subtree structurally equal to `from` is cloned
    /// as `to` instead.
    #[must_use]
    pub fn with_replacement(mut self, from: Expression, to: Expression) -> Self {
        self.replacements.push((from, to));
        self
    }

    /// Returns the replacement for `expression`, or a recursive clone when no
    /// replacement matches.
    #[must_use]
    pub fn replace_or_clone(&self, expression: &Expression) -> Expression {
        for (from, to) in &self.replacements {
            if from == expression {
                return to.clone();
            }
        }
        expression.deep_clone_children(self)
    }
}

//! Per-unit simplification driver.
//!
//! A [`DecompilationUnit`] pairs a name (typically `Class.method`) with the lifted
//! root expression of that method. Simplification runs rewriting passes to a fixed
//! point: De Morgan application pushes negations off boolean combinations, type
//! knowledge folds boolean-constant comparisons, and left-nested synthesized outer
//! references collapse to their final hop.
//!
//! Units are independent, so [`run_units`] fans the batch out across a rayon
//! thread pool. A unit whose simplification fails degrades in isolation; the rest
//! of the batch is unaffected.

use rayon::prelude::*;

use crate::analysis::ir::conditional::ConditionalExpression;
use crate::analysis::ir::expression::Expression;
use crate::analysis::ir::lvalue::LValue;
use crate::analysis::ir::rewrite::{ExpressionRewriter, RewriterFlags, StatementContainer};
use crate::analysis::ir::ssa::SsaIdentifiers;
use crate::Result;

/// Iteration cap for the per-unit fixed-point loop.
const MAX_SIMPLIFY_PASSES: usize = 20;

/// One independently simplifiable piece of a decompilation: a named method body
/// root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompilationUnit {
    name: String,
    root: Expression,
}

impl DecompilationUnit {
    /// Creates a unit from its name and lifted root expression.
    #[must_use]
    pub fn new(name: &str, root: Expression) -> Self {
        Self {
            name: name.to_string(),
            root,
        }
    }

    /// Returns the unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current root expression.
    #[must_use]
    pub const fn root(&self) -> &Expression {
        &self.root
    }

    /// Runs the simplification passes to a fixed point and returns the simplified
    /// root.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RecursionLimit`] when the passes fail to converge
    /// within the iteration cap, which indicates a non-terminating rewrite rather
    /// than a property of the input, and [`crate::Error::InvariantViolation`] when
    /// a pass changed the static type of the root. Both are fatal to this unit
    /// only.
    pub fn simplify(self) -> Result<Expression> {
        let ssa = SsaIdentifiers::new();
        let container = StatementContainer::new(&self.name, 0);
        let mut rewriter = SimplifyRewriter;

        let root_type = self.root.inferred_type().java_type().clone();
        let mut current = self.root;
        for _ in 0..MAX_SIMPLIFY_PASSES {
            let next = rewriter.rewrite_expression(
                current.clone(),
                &ssa,
                &container,
                RewriterFlags::RVALUE,
            );
            if next == current {
                // every pass is type-preserving
                if *next.inferred_type().java_type() != root_type {
                    return Err(invariant_error!(
                        "simplification changed the root type of {}",
                        self.name
                    ));
                }
                return Ok(next);
            }
            current = next;
        }
        Err(crate::Error::RecursionLimit(MAX_SIMPLIFY_PASSES))
    }
}

/// The simplification policy applied by [`DecompilationUnit::simplify`].
///
/// Children first, then the node itself: a NOT over a boolean combination is
/// replaced by the De Morgan-pushed form, conditionals are re-simplified with type
/// knowledge, and an outer-reference field access collapses its left-nested hop
/// chain.
struct SimplifyRewriter;

impl ExpressionRewriter for SimplifyRewriter {
    fn rewrite_expression(
        &mut self,
        expression: Expression,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> Expression {
        let expression = expression.apply_expression_rewriter(self, ssa, container, flags);
        match expression {
            Expression::Conditional(conditional) => {
                let pushed = match conditional {
                    ConditionalExpression::Not(not)
                        if matches!(*not.inner, ConditionalExpression::Boolean(_)) =>
                    {
                        not.inner.get_demorgan_applied(true)
                    }
                    other => other,
                };
                Expression::Conditional(pushed.optimise_for_type())
            }
            Expression::LValue(mut read) => {
                if let LValue::Field(field) = &mut read.lvalue {
                    field.collapse_nested_outer_refs();
                }
                Expression::LValue(read)
            }
            other => other,
        }
    }
}

/// How one unit fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Simplification converged; the simplified root
    Simplified(Expression),
    /// Simplification failed; the unit is reported and skipped, the run continues
    Degraded {
        /// Human-readable failure description
        reason: String,
    },
}

/// The outcome of one unit in a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResult {
    /// The unit name, as given at construction
    pub name: String,
    /// How the unit fared
    pub outcome: UnitOutcome,
}

/// Simplifies a batch of units in parallel.
///
/// Results come back in input order regardless of scheduling. A failing unit
/// degrades in isolation and never aborts the batch.
#[must_use]
pub fn run_units(units: Vec<DecompilationUnit>) -> Vec<UnitResult> {
    units
        .into_par_iter()
        .map(|unit| {
            let name = unit.name.clone();
            let outcome = match unit.simplify() {
                Ok(root) => UnitOutcome::Simplified(root),
                Err(error) => UnitOutcome::Degraded {
                    reason: error.to_string(),
                },
            };
            UnitResult { name, outcome }
        })
        .collect()
}

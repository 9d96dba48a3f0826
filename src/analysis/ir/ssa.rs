//! SSA version tracking for single-use inlining.
//!
//! The lifter assigns every lvalue write a fresh [`SsaVersion`]; each program point
//! carries an [`SsaIdentifiers`] view recording which version of each lvalue is
//! live there. Single-use inlining replaces a read of an lvalue with its defining
//! expression only when the definition's version is still the live one at the read
//! site and the definition has exactly one use - otherwise the substitution would
//! move a computation across an intervening redefinition or duplicate it.
//!
//! [`DefinitionTable`] is the bookkeeping side: it records definitions and use
//! counts as the lifter walks a unit, then hands out a [`SingleUseRewriter`] that
//! the expression traversal consults at every leaf read.

use std::collections::HashMap;
use std::fmt;

use crate::analysis::ir::expression::Expression;
use crate::analysis::ir::lvalue::LValue;
use crate::analysis::ir::rewrite::{LValueRewriter, StatementContainer};

/// SSA version of one lvalue write.
///
/// Versions are per-lvalue: two different lvalues may share a version number
/// without relation. Comparison is only meaningful between versions of the same
/// lvalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SsaVersion(u32);

impl SsaVersion {
    /// Creates a version from its raw number.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SsaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Hands out fresh versions, one counter per lvalue.
#[derive(Debug, Default)]
pub struct SsaIdentifierFactory {
    counters: HashMap<LValue, u32>,
}

impl SsaIdentifierFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next version for `lvalue`, starting at 0 for its first write.
    pub fn fresh(&mut self, lvalue: &LValue) -> SsaVersion {
        let counter = self.counters.entry(lvalue.clone()).or_insert(0);
        let version = SsaVersion::new(*counter);
        *counter += 1;
        version
    }
}

/// The live lvalue versions at one program point.
///
/// A cheap value type: the lifter clones the view forward through straight-line
/// code and merges views at join points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsaIdentifiers {
    live: HashMap<LValue, SsaVersion>,
}

impl SsaIdentifiers {
    /// Creates an empty view (no lvalue has been written yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write: `version` becomes the live version of `lvalue`.
    pub fn define(&mut self, lvalue: LValue, version: SsaVersion) {
        self.live.insert(lvalue, version);
    }

    /// Returns the live version of `lvalue`, or `None` before its first write.
    #[must_use]
    pub fn version_of(&self, lvalue: &LValue) -> Option<SsaVersion> {
        self.live.get(lvalue).copied()
    }

    /// Merges another view at a control-flow join.
    ///
    /// An lvalue survives the merge only when both paths agree on its version;
    /// disagreement means the value depends on the path taken, so no single
    /// definition can be inlined past the join.
    pub fn merge(&mut self, other: &SsaIdentifiers) {
        self.live.retain(|lvalue, version| {
            other.version_of(lvalue) == Some(*version)
        });
    }

    /// Returns `true` when a definition made under version `defined` is still the
    /// live definition of `lvalue` in this view.
    #[must_use]
    pub fn is_valid_replacement(&self, lvalue: &LValue, defined: SsaVersion) -> bool {
        self.version_of(lvalue) == Some(defined)
    }
}

#[derive(Debug)]
struct Definition {
    version: SsaVersion,
    expression: Expression,
    uses: usize,
    consumed: bool,
}

/// Records definitions and use counts while a unit is walked.
///
/// One pass records every write (with the defining expression and its version) and
/// bumps a use count for every read; [`DefinitionTable::into_rewriter`] then
/// freezes the table into the substitution policy.
#[derive(Debug, Default)]
pub struct DefinitionTable {
    definitions: HashMap<LValue, Definition>,
}

impl DefinitionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write of `lvalue`. A later write of the same lvalue supersedes
    /// the earlier definition.
    pub fn record_definition(
        &mut self,
        lvalue: LValue,
        version: SsaVersion,
        expression: Expression,
    ) {
        self.definitions.insert(
            lvalue,
            Definition {
                version,
                expression,
                uses: 0,
                consumed: false,
            },
        );
    }

    /// Records a read of `lvalue`.
    pub fn record_use(&mut self, lvalue: &LValue) {
        if let Some(definition) = self.definitions.get_mut(lvalue) {
            definition.uses += 1;
        }
    }

    /// Freezes the table into the single-use substitution policy.
    #[must_use]
    pub fn into_rewriter(self) -> SingleUseRewriter {
        SingleUseRewriter {
            definitions: self.definitions,
        }
    }
}

/// Substitution policy: inline a definition into its sole use.
///
/// A read is replaced only when the defining expression has exactly one recorded
/// use and its version is still live at the read site. Each definition is handed
/// out at most once, so a traversal that (incorrectly) asked twice would not
/// duplicate the computation.
#[derive(Debug)]
pub struct SingleUseRewriter {
    definitions: HashMap<LValue, Definition>,
}

impl LValueRewriter for SingleUseRewriter {
    fn get_replacement(
        &mut self,
        lvalue: &LValue,
        ssa: &SsaIdentifiers,
        _container: &StatementContainer,
    ) -> Option<Expression> {
        let definition = self.definitions.get_mut(lvalue)?;
        if definition.consumed
            || definition.uses != 1
            || !ssa.is_valid_replacement(lvalue, definition.version)
        {
            return None;
        }
        definition.consumed = true;
        Some(definition.expression.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ir::expression::Expression;
    use crate::analysis::ir::lvalue::LocalVariable;
    use crate::analysis::ir::operators::ArithOp;
    use crate::metadata::typesystem::{InferredJavaType, JavaType, TypeSource};

    fn local(name: &str, slot: u16) -> LValue {
        LValue::from(LocalVariable::new(
            name,
            slot,
            InferredJavaType::new(JavaType::Int, TypeSource::Expression),
        ))
    }

    fn container() -> StatementContainer {
        StatementContainer::new("m", 0)
    }

    #[test]
    fn test_factory_versions_are_per_lvalue() {
        let mut factory = SsaIdentifierFactory::new();
        let a = local("a", 0);
        let b = local("b", 1);
        assert_eq!(factory.fresh(&a), SsaVersion::new(0));
        assert_eq!(factory.fresh(&a), SsaVersion::new(1));
        assert_eq!(factory.fresh(&b), SsaVersion::new(0));
    }

    #[test]
    fn test_merge_drops_disagreeing_versions() {
        let a = local("a", 0);
        let b = local("b", 1);
        let mut left = SsaIdentifiers::new();
        left.define(a.clone(), SsaVersion::new(0));
        left.define(b.clone(), SsaVersion::new(2));
        let mut right = SsaIdentifiers::new();
        right.define(a.clone(), SsaVersion::new(0));
        right.define(b.clone(), SsaVersion::new(3));

        left.merge(&right);
        assert_eq!(left.version_of(&a), Some(SsaVersion::new(0)));
        assert_eq!(left.version_of(&b), None);
    }

    #[test]
    fn test_single_use_definition_is_inlined() {
        let a = local("a", 0);
        let defining = Expression::int_literal(42);

        let mut table = DefinitionTable::new();
        table.record_definition(a.clone(), SsaVersion::new(0), defining.clone());
        table.record_use(&a);
        let mut rewriter = table.into_rewriter();

        let mut ssa = SsaIdentifiers::new();
        ssa.define(a.clone(), SsaVersion::new(0));

        let replacement = rewriter.get_replacement(&a, &ssa, &container());
        assert_eq!(replacement, Some(defining));
        // a definition is handed out at most once
        assert_eq!(rewriter.get_replacement(&a, &ssa, &container()), None);
    }

    #[test]
    fn test_multi_use_definition_stays_put() {
        let a = local("a", 0);
        let mut table = DefinitionTable::new();
        table.record_definition(a.clone(), SsaVersion::new(0), Expression::int_literal(1));
        table.record_use(&a);
        table.record_use(&a);
        let mut rewriter = table.into_rewriter();

        let mut ssa = SsaIdentifiers::new();
        ssa.define(a.clone(), SsaVersion::new(0));
        assert_eq!(rewriter.get_replacement(&a, &ssa, &container()), None);
    }

    #[test]
    fn test_stale_version_blocks_inlining() {
        let a = local("a", 0);
        let mut table = DefinitionTable::new();
        table.record_definition(a.clone(), SsaVersion::new(0), Expression::int_literal(1));
        table.record_use(&a);
        let mut rewriter = table.into_rewriter();

        // the read site sees a later write of a
        let mut ssa = SsaIdentifiers::new();
        ssa.define(a.clone(), SsaVersion::new(1));
        assert_eq!(rewriter.get_replacement(&a, &ssa, &container()), None);
    }

    #[test]
    fn test_traversal_substitutes_leaf_and_keeps_composite_shape() {
        use crate::analysis::ir::expression::ArithmeticOperation;

        let tmp = local("tmp", 2);
        let defining = Expression::int_literal(7);

        let mut table = DefinitionTable::new();
        table.record_definition(tmp.clone(), SsaVersion::new(0), defining);
        table.record_use(&tmp);
        let mut rewriter = table.into_rewriter();

        let mut ssa = SsaIdentifiers::new();
        ssa.define(tmp.clone(), SsaVersion::new(0));

        // tmp + 1  becomes  7 + 1; the addition node itself survives
        let sum = Expression::Arithmetic(ArithmeticOperation::new(
            Expression::lvalue_read(tmp),
            Expression::int_literal(1),
            ArithOp::Add,
        ));
        let rewritten = sum.replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
        assert_eq!(rewritten.to_string(), "7 + 1");
        assert!(matches!(rewritten, Expression::Arithmetic(_)));
    }
}

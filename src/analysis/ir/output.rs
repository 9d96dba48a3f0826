//! Emission and collection sinks.
//!
//! The IR does not own the final text formatting layer; it talks to it through the
//! [`Dumper`] trait, an append-only sink distinguishing identifiers from literal text
//! so the formatter can style them. [`PlainDumper`] is the unstyled implementation
//! backing the `Display` impls and tests.
//!
//! The collection sinks gather what an IR subtree refers to: lvalues (for liveness
//! and declaration insertion) and types (for import generation).

use std::collections::HashSet;

use crate::analysis::ir::lvalue::LValue;
use crate::metadata::typesystem::JavaType;

/// Append-only, precedence-aware text sink.
///
/// Child nodes decide their own parenthesization from the precedence their parent
/// passes down; see
/// [`Expression::dump_with_outer_precedence`](crate::analysis::ir::Expression::dump_with_outer_precedence).
pub trait Dumper {
    /// Emits literal text (operators, punctuation, keywords).
    fn print(&mut self, text: &str);

    /// Emits an identifier, distinct from literal text for styling.
    fn identifier(&mut self, name: &str);
}

/// Unstyled dumper accumulating into a `String`.
#[derive(Debug, Default)]
pub struct PlainDumper {
    buffer: String,
}

impl PlainDumper {
    /// Creates an empty dumper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the dumper, returning the accumulated text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Dumper for PlainDumper {
    fn print(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn identifier(&mut self, name: &str) {
        self.buffer.push_str(name);
    }
}

/// Visitor over the lvalues an IR subtree mentions.
pub trait LValueUsageCollector {
    /// Called once per lvalue occurrence, in traversal order.
    fn collect(&mut self, lvalue: &LValue);
}

/// Collector gathering distinct lvalues with set semantics.
#[derive(Debug, Default)]
pub struct LValueUsageSet {
    lvalues: HashSet<LValue>,
}

impl LValueUsageSet {
    /// Creates an empty set collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the given lvalue was collected.
    #[must_use]
    pub fn contains(&self, lvalue: &LValue) -> bool {
        self.lvalues.contains(lvalue)
    }

    /// Consumes the collector, returning the distinct lvalues (no ordering guarantee).
    #[must_use]
    pub fn into_set(self) -> HashSet<LValue> {
        self.lvalues
    }
}

impl LValueUsageCollector for LValueUsageSet {
    fn collect(&mut self, lvalue: &LValue) {
        self.lvalues.insert(lvalue.clone());
    }
}

/// Write-only accumulator of every type an IR subtree references.
///
/// Consumed by the import-declaration generator: each node reports its own inferred
/// type, and field variables additionally report the owning class type and, when
/// resolution succeeded, the field's declared type.
#[derive(Debug, Default)]
pub struct TypeUsageSink {
    types: HashSet<JavaType>,
}

impl TypeUsageSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one referenced type.
    pub fn collect(&mut self, ty: &JavaType) {
        self.types.insert(ty.clone());
    }

    /// Returns `true` if the given type was recorded.
    #[must_use]
    pub fn contains(&self, ty: &JavaType) -> bool {
        self.types.contains(ty)
    }

    /// Consumes the sink, returning the distinct referenced types.
    #[must_use]
    pub fn into_set(self) -> HashSet<JavaType> {
        self.types
    }
}

// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
#![deny(unsafe_code)]

//! # declass
//!
//! A framework for reconstructing readable structured source from compiled JVM class files.
//! Built in pure Rust, `declass` provides the expression/lvalue intermediate representation
//! (IR) at the heart of a Java decompiler: typed expression trees, SSA-based single-use
//! inlining, boolean simplification algebra, and fallible symbolic resolution against a
//! lazily-populated type universe.
//!
//! ## Features
//!
//! - **🌳 Typed expression IR** - Closed sum types for expressions, conditionals and lvalues,
//!   exhaustively matched so new node kinds cannot be silently mishandled
//! - **🔁 Rewriting protocols** - Single-use SSA inlining and generic visitor-style rewriting,
//!   supported uniformly by every node kind
//! - **🧮 Boolean algebra** - De Morgan normalization, negation, and type-driven condition
//!   simplification for natural-reading `if`/`while` conditions
//! - **🔍 Fallible resolution** - Field references resolve against a partial type universe and
//!   degrade gracefully to textual fallbacks when a class cannot be loaded
//! - **⚡ Concurrent type universe** - At-most-once memoized class loading shared across
//!   parallel per-method decompilation units
//! - **🛡️ Memory safe** - Built in Rust with comprehensive error handling
//!
//! ## Quick Start
//!
//! Add `declass` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! declass = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use declass::prelude::*;
//!
//! // A lazily-populated type universe backed by an in-memory class source
//! let universe = TypeUniverse::new(Box::new(MapClassSource::new()));
//! assert!(matches!(
//!     universe.resolve(&ClassName::from_binary("com/example/Missing")),
//!     ClassOutcome::NotLoadable
//! ));
//! ```
//!
//! ### Boolean Simplification Example
//!
//! ```rust
//! use declass::prelude::*;
//!
//! // !(a < b && c < d)  ==>  a >= b || c >= d
//! let a_lt_b = ComparisonOperation::new(local_read("a", 0), local_read("b", 1), CompOp::Lt);
//! let c_lt_d = ComparisonOperation::new(local_read("c", 2), local_read("d", 3), CompOp::Lt);
//! let both = BooleanOperation::new(a_lt_b.into(), c_lt_d.into(), BoolOp::And);
//!
//! let pushed = ConditionalExpression::from(both).get_demorgan_applied(true);
//! assert_eq!(pushed.to_string(), "(a >= b) || (c >= d)");
//!
//! fn local_read(name: &str, slot: u16) -> Expression {
//!     Expression::lvalue_read(LValue::from(LocalVariable::new(
//!         name,
//!         slot,
//!         InferredJavaType::new(JavaType::Int, TypeSource::Expression),
//!     )))
//! }
//! ```
//!
//! ## Architecture
//!
//! `declass` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Class model, descriptors and the lazily-populated type universe
//! - [`analysis`] - The expression/lvalue IR, SSA identity tracking and rewriting passes
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### The IR
//!
//! The [`analysis::ir`] module is the core of the crate. Expression trees are built once by
//! a bytecode lifter (not part of this crate), then mutated in place by rewriting passes
//! until no further simplification applies:
//!
//! - [`analysis::ir::Expression`] - computed values (literals, arithmetic, casts, reads)
//! - [`analysis::ir::ConditionalExpression`] - boolean-valued trees with the De Morgan algebra
//! - [`analysis::ir::LValue`] - assignable storage locations (locals and fields)
//!
//! ### Resolution
//!
//! The [`metadata::typesystem::TypeUniverse`] memoizes class loading with at-most-once
//! semantics under concurrent access. Field references resolve against it once, at node
//! construction; an unlocatable class is a designed fallback path, never an error.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Per-unit defects are scoped:
//! a run over many classes completes and reports a degraded marker for the units it could
//! not simplify, never aborting the whole run. See [`analysis::units`].
//!
//! ## Standards Compliance
//!
//! The class model follows the **JVM Specification** (class file format, chapter 4): binary
//! class names, erased field descriptors, and access flags including the `ACC_SYNTHETIC`
//! markers compilers attach to outer-instance reference fields of nested classes.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the declass library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use declass::prelude::*;
///
/// let universe = TypeUniverse::new(Box::new(MapClassSource::new()));
/// assert_eq!(universe.loaded_class_count(), 0);
/// ```
pub mod prelude;

/// Class model, descriptors, and the lazily-populated type universe.
///
/// This module owns everything the IR resolves against:
///
/// - [`metadata::classfile`] - loaded class and field models, symbolic field references
/// - [`metadata::typesystem`] - Java types, inferred types with provenance, and the
///   concurrent memoizing [`metadata::typesystem::TypeUniverse`]
/// - [`metadata::access`] - JVM access flags
/// - [`metadata::descriptor`] - erased field-descriptor parsing
pub mod metadata;

/// The expression/lvalue IR and its rewriting passes.
///
/// This module provides:
///
/// - [`analysis::ir`] - the node taxonomy and all per-node contracts (size, dump,
///   equality, clone, lvalue/type collection, the two rewriting protocols)
/// - [`analysis::ir::ssa`] - SSA identity snapshots and single-use inlining
/// - [`analysis::units`] - the per-method parallel simplification driver
pub mod analysis;

pub use error::Error;

/// Result type-alias, which is used by everything within this crate
pub type Result<T> = std::result::Result<T, Error>;

//! JVM class model and type system.
//!
//! This module bridges the gap between raw class-file records (produced by an external
//! container reader) and the typed model the IR resolves against.
//!
//! # Key Components
//!
//! - [`access::AccessFlags`] - JVM class/field access flags
//! - [`descriptor`] - erased field-descriptor parsing
//! - [`classfile`] - loaded class and field models plus symbolic field references
//! - [`typesystem`] - Java types, inferred types with provenance, and the concurrent
//!   memoizing [`typesystem::TypeUniverse`]
//!
//! # Ownership
//!
//! Loaded class and field models are shared (`Arc`) and immutable after their first
//! successful load; they outlive any single method's IR. IR nodes hold non-owning links
//! back into this module, alongside textual fallback identities that stay usable when a
//! class could not be loaded.

pub mod access;
pub mod classfile;
pub mod descriptor;
pub mod typesystem;

//! Java type system for decompilation.
//!
//! This module provides the type vocabulary the IR is written in, and the registry
//! the IR resolves symbolic references against.
//!
//! # Key Components
//!
//! - [`JavaType`]: Closed sum of the erased types the class file format expresses
//! - [`ClassName`]: Interned binary class name
//! - [`InferredJavaType`]: A type belief with [`TypeSource`] provenance, attached to
//!   every IR node and refined in place by later passes
//! - [`TypeUniverse`]: Central lazily-populated registry of loaded class models
//! - [`ClassSource`]: Boundary trait implemented by the container-reading layer
//!
//! # Resolution Model
//!
//! Resolution is attempted once, at IR node construction, and never retried: the
//! universe's outcomes are terminal, so a class that becomes loadable later is
//! invisible to nodes already built. This fixed resolution order is a deliberate
//! simplification; see [`TypeUniverse`] for the memoization contract.

mod inference;
mod registry;
mod types;

pub use inference::{InferredJavaType, TypeSource};
pub use registry::{ClassOutcome, ClassSource, MapClassSource, TypeUniverse};
pub use types::{ClassName, JavaType};

//! JVM access flags for classes and fields.
//!
//! The JVM class file format attaches a 16-bit flag word to every class, field and
//! method. This module models the subset relevant to classes and fields; the IR cares
//! in particular about [`AccessFlags::SYNTHETIC`], which compilers set on the hidden
//! `this$N` fields that give nested classes access to enclosing instances.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Access and property flags of a class or field
    pub struct AccessFlags: u16 {
        /// Declared public; may be accessed from outside its package
        const PUBLIC = 0x0001;
        /// Declared private; accessible only within the defining class
        const PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final; never directly assigned to after object construction
        const FINAL = 0x0010;
        /// Declared volatile; cannot be cached
        const VOLATILE = 0x0040;
        /// Declared transient; not written or read by a persistent object manager
        const TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an enum
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Returns `true` if the `SYNTHETIC` flag is set.
    ///
    /// Synthetic members were emitted by the compiler and have no counterpart in the
    /// original source. The outer-reference collapsing pass only ever considers
    /// synthetic fields.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.contains(AccessFlags::SYNTHETIC)
    }

    /// Returns `true` if the `STATIC` flag is set.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.contains(AccessFlags::STATIC)
    }

    /// Returns `true` if the `FINAL` flag is set.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.contains(AccessFlags::FINAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_flags_predicates() {
        let flags = AccessFlags::PRIVATE | AccessFlags::FINAL | AccessFlags::SYNTHETIC;
        assert!(flags.is_synthetic());
        assert!(flags.is_final());
        assert!(!flags.is_static());
    }

    #[test]
    fn test_access_flags_from_bits() {
        let flags = AccessFlags::from_bits_truncate(0x1018);
        assert!(flags.contains(AccessFlags::STATIC));
        assert!(flags.contains(AccessFlags::FINAL));
        assert!(flags.is_synthetic());
    }
}

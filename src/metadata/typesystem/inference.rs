//! Inferred types with provenance.
//!
//! Every IR node carries an [`InferredJavaType`]: the type the decompiler currently
//! believes the node has, together with where that belief came from. Later passes
//! narrow beliefs in place; a type recovered from a field's declaration outranks one
//! merely copied off an unresolved reference's erased descriptor.

use std::fmt;

use crate::metadata::typesystem::JavaType;

/// Where a type belief came from.
///
/// Provenance decides which of two competing beliefs survives when a later pass
/// learns more. Resolution-derived sources are authoritative; reference-derived
/// sources are placeholders that may be improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// Derived from the expression context this node appears in
    Expression,
    /// Copied from a literal constant
    Literal,
    /// Derived from the operand types of an operation
    Operation,
    /// Taken from the declared signature of a successfully resolved field
    FieldDeclaration,
    /// Copied from a symbolic reference whose owning class could not be loaded;
    /// the erased descriptor stands in for the declared type
    UnresolvedReference,
}

impl TypeSource {
    /// Returns `true` for sources backed by an actual declaration rather than a
    /// reference or a guess.
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        matches!(self, TypeSource::FieldDeclaration | TypeSource::Literal)
    }
}

/// The currently-believed static type of an IR node, with provenance.
///
/// Created once when the node is lifted and refined in place as passes narrow it.
/// The node's kind never changes; only the belief does.
///
/// # Examples
///
/// ```rust
/// use declass::metadata::typesystem::{InferredJavaType, JavaType, TypeSource};
///
/// let mut inferred = InferredJavaType::new(JavaType::Int, TypeSource::UnresolvedReference);
/// inferred.narrow_to(JavaType::Boolean, TypeSource::FieldDeclaration);
/// assert_eq!(*inferred.java_type(), JavaType::Boolean);
/// assert_eq!(inferred.source(), TypeSource::FieldDeclaration);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InferredJavaType {
    ty: JavaType,
    source: TypeSource,
}

impl InferredJavaType {
    /// Creates a new inferred type.
    #[must_use]
    pub const fn new(ty: JavaType, source: TypeSource) -> Self {
        Self { ty, source }
    }

    /// The inferred type fixed to `boolean`, as carried by every conditional node.
    #[must_use]
    pub const fn boolean() -> Self {
        Self {
            ty: JavaType::Boolean,
            source: TypeSource::Expression,
        }
    }

    /// Returns the currently-believed type.
    #[must_use]
    pub const fn java_type(&self) -> &JavaType {
        &self.ty
    }

    /// Returns the provenance of the current belief.
    #[must_use]
    pub const fn source(&self) -> TypeSource {
        self.source
    }

    /// Replaces the belief unconditionally.
    pub fn narrow_to(&mut self, ty: JavaType, source: TypeSource) {
        self.ty = ty;
        self.source = source;
    }

    /// Adopts `other` if it is better-provenanced than the current belief.
    ///
    /// A declaration-backed belief never yields to a reference-derived one; two
    /// beliefs of equal rank keep the existing one (first writer wins, matching the
    /// fixed resolution order of node construction).
    pub fn improve_from(&mut self, other: &InferredJavaType) {
        if other.source.is_authoritative() && !self.source.is_authoritative() {
            self.ty = other.ty.clone();
            self.source = other.source;
        }
    }
}

impl fmt::Display for InferredJavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::ClassName;

    #[test]
    fn test_boolean_constructor() {
        let inferred = InferredJavaType::boolean();
        assert!(inferred.java_type().is_boolean());
        assert_eq!(inferred.source(), TypeSource::Expression);
    }

    #[test]
    fn test_improve_adopts_authoritative() {
        let mut inferred = InferredJavaType::new(
            JavaType::Reference(ClassName::from_binary("java/lang/Object")),
            TypeSource::UnresolvedReference,
        );
        let declared = InferredJavaType::new(
            JavaType::Reference(ClassName::from_binary("java/lang/String")),
            TypeSource::FieldDeclaration,
        );
        inferred.improve_from(&declared);
        assert_eq!(
            inferred.java_type().class_name().unwrap().simple_name(),
            "String"
        );
    }

    #[test]
    fn test_improve_keeps_authoritative() {
        let mut inferred = InferredJavaType::new(JavaType::Boolean, TypeSource::FieldDeclaration);
        let worse = InferredJavaType::new(JavaType::Int, TypeSource::UnresolvedReference);
        inferred.improve_from(&worse);
        assert_eq!(*inferred.java_type(), JavaType::Boolean);
    }
}

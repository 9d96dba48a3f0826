//! Loaded class and field models.
//!
//! A [`ClassModel`] is the loaded, analysis-facing form of one class file: name,
//! superclass, access flags, declared fields and inner-class records. Models are
//! shared (`Arc`) across all decompilation units of a run and immutable after
//! loading, except for one-shot markers such as the synthetic-outer-reference flag
//! on fields.
//!
//! [`FieldRef`] is the other side of the boundary: the immutable symbolic triple
//! (owning type, field name, erased descriptor) as the container reader found it in
//! the constant pool. The IR resolves references against models through the
//! [`crate::metadata::typesystem::TypeUniverse`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::metadata::access::AccessFlags;
use crate::metadata::typesystem::{ClassName, JavaType};

/// Reference to a shared [`ClassModel`]
pub type ClassRc = Arc<ClassModel>;
/// Reference to a shared [`FieldModel`]
pub type FieldRc = Arc<FieldModel>;

/// A symbolic field reference as carried by the binary format.
///
/// Immutable triple of owning type, field name and erased descriptor type. This is
/// what a `getfield`/`putfield` instruction actually says; whether the owning class
/// can be loaded to learn more is a separate question answered at IR construction.
///
/// # Examples
///
/// ```rust
/// use declass::metadata::{classfile::FieldRef, typesystem::{ClassName, JavaType}};
///
/// let field_ref = FieldRef::new(
///     ClassName::from_binary("com/example/Point"),
///     "x",
///     JavaType::Int,
/// );
/// assert_eq!(field_ref.name(), "x");
/// assert_eq!(field_ref.descriptor(), "I");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    owner: ClassName,
    name: String,
    erased_type: JavaType,
}

impl FieldRef {
    /// Creates a field reference from its three components.
    #[must_use]
    pub fn new(owner: ClassName, name: &str, erased_type: JavaType) -> Self {
        Self {
            owner,
            name: name.to_string(),
            erased_type,
        }
    }

    /// Returns the owning type reference.
    #[must_use]
    pub const fn owner(&self) -> &ClassName {
        &self.owner
    }

    /// Returns the referenced field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the erased type the reference carries.
    ///
    /// This may be less specific than the field's declared type; resolution prefers
    /// the declaration when the owning class loads.
    #[must_use]
    pub const fn erased_type(&self) -> &JavaType {
        &self.erased_type
    }

    /// Returns the erased descriptor string of the reference.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.erased_type.descriptor()
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.descriptor())
    }
}

/// A field as declared by a loaded class.
///
/// Immutable after loading apart from the synthetic-outer-reference marker, which the
/// inner-class analysis sets exactly once. The marker is what the outer-reference
/// collapsing pass keys on; a field that is merely `SYNTHETIC` but not an outer
/// reference (e.g. `$assertionsDisabled`) is never collapsed.
pub struct FieldModel {
    name: String,
    erased_type: JavaType,
    declared_type: JavaType,
    flags: AccessFlags,
    synthetic_outer_ref: AtomicBool,
}

impl FieldModel {
    /// Creates a field model whose declared type is its own erasure (no generic
    /// signature attribute).
    ///
    /// Fields that are `SYNTHETIC` and follow the `this$N` naming convention compilers
    /// use for outer-instance references are pre-marked as such; the inner-class pass
    /// may mark further fields later via [`FieldModel::mark_synthetic_outer_ref`].
    #[must_use]
    pub fn new(name: &str, declared_type: JavaType, flags: AccessFlags) -> Self {
        Self::with_signature(name, declared_type.clone(), declared_type, flags)
    }

    /// Creates a field model carrying both the erased descriptor type and the
    /// declared type from a generic signature attribute.
    ///
    /// References match against the erasure; a resolved access adopts the declared
    /// type, which may be more specific than the descriptor the reference carried.
    #[must_use]
    pub fn with_signature(
        name: &str,
        erased_type: JavaType,
        declared_type: JavaType,
        flags: AccessFlags,
    ) -> Self {
        let outer = flags.is_synthetic() && is_outer_ref_name(name);
        Self {
            name: name.to_string(),
            erased_type,
            declared_type,
            flags,
            synthetic_outer_ref: AtomicBool::new(outer),
        }
    }

    /// Returns the declared field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the erased type from the field's descriptor. This is what symbolic
    /// references match against.
    #[must_use]
    pub const fn erased_type(&self) -> &JavaType {
        &self.erased_type
    }

    /// Returns the declared type from the field's signature. Falls together with
    /// [`FieldModel::erased_type`] when the field has no generic signature.
    #[must_use]
    pub const fn declared_type(&self) -> &JavaType {
        &self.declared_type
    }

    /// Returns the erased descriptor string.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.erased_type.descriptor()
    }

    /// Returns the field's access flags.
    #[must_use]
    pub const fn flags(&self) -> AccessFlags {
        self.flags
    }

    /// Returns `true` if this field is a compiler-synthesized reference to an
    /// enclosing instance.
    #[must_use]
    pub fn is_synthetic_outer_ref(&self) -> bool {
        self.synthetic_outer_ref.load(Ordering::Relaxed)
    }

    /// Marks this field as a synthetic outer reference.
    ///
    /// One-shot and monotonic; called by the inner-class constructor analysis when it
    /// proves the threading pattern for a field the naming convention missed.
    pub fn mark_synthetic_outer_ref(&self) {
        self.synthetic_outer_ref.store(true, Ordering::Relaxed);
    }
}

impl fmt::Debug for FieldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldModel")
            .field("name", &self.name)
            .field("erased_type", &self.erased_type)
            .field("declared_type", &self.declared_type)
            .field("flags", &self.flags)
            .field("synthetic_outer_ref", &self.is_synthetic_outer_ref())
            .finish()
    }
}

/// Returns `true` for the `this$N` names compilers give outer-instance fields.
pub(crate) fn is_outer_ref_name(name: &str) -> bool {
    name.strip_prefix("this$")
        .is_some_and(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
}

/// Result of looking up a declared field on a loaded class.
///
/// An explicit result rather than an error: a class that loads but does not declare
/// the referenced field (a metadata inconsistency) folds into the same fallback path
/// as an unloadable class.
#[derive(Debug, Clone)]
pub enum FieldLookup {
    /// The class declares a matching field
    Found(FieldRc),
    /// No field with that name and descriptor is declared
    NotFound,
}

/// One record of the class's inner-class metadata.
///
/// Purely descriptive of the nesting relationship; reserved for the inner-class
/// naming analysis.
#[derive(Debug, Clone)]
pub struct InnerClassInfo {
    inner_class: Option<ClassName>,
    outer_class: Option<ClassName>,
    inner_name: Option<String>,
    flags: AccessFlags,
}

impl InnerClassInfo {
    /// Creates an inner-class record. Anonymous classes carry no inner name; local
    /// classes carry no outer class.
    #[must_use]
    pub const fn new(
        inner_class: Option<ClassName>,
        outer_class: Option<ClassName>,
        inner_name: Option<String>,
        flags: AccessFlags,
    ) -> Self {
        Self {
            inner_class,
            outer_class,
            inner_name,
            flags,
        }
    }

    /// Returns the nested class, if recorded.
    #[must_use]
    pub const fn inner_class(&self) -> Option<&ClassName> {
        self.inner_class.as_ref()
    }

    /// Returns the enclosing class, if recorded (absent for local/anonymous classes).
    #[must_use]
    pub const fn outer_class(&self) -> Option<&ClassName> {
        self.outer_class.as_ref()
    }

    /// Returns the simple source name of the nested class (absent for anonymous ones).
    #[must_use]
    pub fn inner_name(&self) -> Option<&str> {
        self.inner_name.as_deref()
    }

    /// Returns the recorded access flags of the nested class.
    #[must_use]
    pub const fn flags(&self) -> AccessFlags {
        self.flags
    }
}

/// A loaded class model.
///
/// Produced by a [`crate::metadata::typesystem::ClassSource`], registered in the
/// [`crate::metadata::typesystem::TypeUniverse`], and shared read-only from then on.
/// Field and inner-class lists are append-only so loading can publish the model
/// before enrichment passes finish.
pub struct ClassModel {
    name: ClassName,
    super_name: Option<ClassName>,
    flags: AccessFlags,
    fields: boxcar::Vec<FieldRc>,
    inner_classes: boxcar::Vec<InnerClassInfo>,
}

impl ClassModel {
    /// Creates an empty class model.
    #[must_use]
    pub const fn new(name: ClassName, super_name: Option<ClassName>, flags: AccessFlags) -> Self {
        Self {
            name,
            super_name,
            flags,
            fields: boxcar::Vec::new(),
            inner_classes: boxcar::Vec::new(),
        }
    }

    /// Returns the binary name of this class.
    #[must_use]
    pub const fn name(&self) -> &ClassName {
        &self.name
    }

    /// Returns the superclass name (`None` only for `java/lang/Object`).
    #[must_use]
    pub const fn super_name(&self) -> Option<&ClassName> {
        self.super_name.as_ref()
    }

    /// Returns the class access flags.
    #[must_use]
    pub const fn flags(&self) -> AccessFlags {
        self.flags
    }

    /// Appends a declared field.
    pub fn add_field(&self, field: FieldModel) -> FieldRc {
        let field = Arc::new(field);
        self.fields.push(field.clone());
        field
    }

    /// Appends an inner-class record.
    pub fn add_inner_class(&self, info: InnerClassInfo) {
        self.inner_classes.push(info);
    }

    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldRc> {
        self.fields.iter().map(|(_, field)| field)
    }

    /// Returns the inner-class records.
    pub fn inner_classes(&self) -> impl Iterator<Item = &InnerClassInfo> {
        self.inner_classes.iter().map(|(_, info)| info)
    }

    /// Looks up a declared field by name and erased descriptor.
    ///
    /// Both must match; two fields may share a name across the inheritance chain, and
    /// this lookup deliberately does not walk superclasses - the reference names the
    /// class whose constant-pool entry was used.
    #[must_use]
    pub fn find_field(&self, name: &str, erased_type: &JavaType) -> FieldLookup {
        for (_, field) in self.fields.iter() {
            if field.name() == name && field.erased_type() == erased_type {
                return FieldLookup::Found(field.clone());
            }
        }
        FieldLookup::NotFound
    }
}

impl fmt::Debug for ClassModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassModel")
            .field("name", &self.name)
            .field("super_name", &self.super_name)
            .field("flags", &self.flags)
            .field("fields", &self.fields.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_name() -> ClassName {
        ClassName::from_binary("java/lang/Object")
    }

    #[test]
    fn test_field_ref_accessors() {
        let field_ref = FieldRef::new(ClassName::from_binary("com/example/A"), "count", JavaType::Int);
        assert_eq!(field_ref.name(), "count");
        assert_eq!(field_ref.descriptor(), "I");
        assert_eq!(field_ref.to_string(), "com.example.A.count:I");
    }

    #[test]
    fn test_outer_ref_naming_convention() {
        assert!(is_outer_ref_name("this$0"));
        assert!(is_outer_ref_name("this$12"));
        assert!(!is_outer_ref_name("this$"));
        assert!(!is_outer_ref_name("this$x"));
        assert!(!is_outer_ref_name("val$captured"));
    }

    #[test]
    fn test_field_model_outer_ref_premarking() {
        let outer = FieldModel::new(
            "this$0",
            JavaType::Reference(object_name()),
            AccessFlags::SYNTHETIC | AccessFlags::FINAL,
        );
        assert!(outer.is_synthetic_outer_ref());

        // Synthetic alone is not enough without the naming convention.
        let assertions = FieldModel::new("$assertionsDisabled", JavaType::Boolean, AccessFlags::SYNTHETIC);
        assert!(!assertions.is_synthetic_outer_ref());

        // Naming alone is not enough without the flag.
        let impostor = FieldModel::new("this$0", JavaType::Reference(object_name()), AccessFlags::PRIVATE);
        assert!(!impostor.is_synthetic_outer_ref());
        impostor.mark_synthetic_outer_ref();
        assert!(impostor.is_synthetic_outer_ref());
    }

    #[test]
    fn test_find_field_matches_name_and_descriptor() {
        let class = ClassModel::new(ClassName::from_binary("com/example/A"), Some(object_name()), AccessFlags::PUBLIC);
        class.add_field(FieldModel::new("x", JavaType::Int, AccessFlags::PRIVATE));
        class.add_field(FieldModel::new("x", JavaType::Long, AccessFlags::PRIVATE));

        match class.find_field("x", &JavaType::Long) {
            FieldLookup::Found(field) => assert_eq!(*field.declared_type(), JavaType::Long),
            FieldLookup::NotFound => panic!("expected to find x:J"),
        }
        assert!(matches!(class.find_field("y", &JavaType::Int), FieldLookup::NotFound));
        assert!(matches!(class.find_field("x", &JavaType::Boolean), FieldLookup::NotFound));
    }

    #[test]
    fn test_find_field_matches_erasure_but_keeps_signature_type() {
        // A generic field erases to Object in the descriptor while declaring String
        // in the signature; lookup keys on the erasure.
        let string = JavaType::Reference(ClassName::from_binary("java/lang/String"));
        let class = ClassModel::new(ClassName::from_binary("com/example/Box"), Some(object_name()), AccessFlags::PUBLIC);
        class.add_field(FieldModel::with_signature(
            "value",
            JavaType::Reference(object_name()),
            string.clone(),
            AccessFlags::PRIVATE,
        ));

        match class.find_field("value", &JavaType::Reference(object_name())) {
            FieldLookup::Found(field) => {
                assert_eq!(*field.erased_type(), JavaType::Reference(object_name()));
                assert_eq!(*field.declared_type(), string);
                assert_eq!(field.descriptor(), "Ljava/lang/Object;");
            }
            FieldLookup::NotFound => panic!("expected erasure match"),
        }
        // The signature type is not what references carry.
        assert!(matches!(class.find_field("value", &string), FieldLookup::NotFound));
    }
}

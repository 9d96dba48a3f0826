//! Java type representation.
//!
//! [`JavaType`] is a closed sum over the erased types the class file format can
//! express: the eight primitives, `void`, reference types and arrays. Being a closed
//! enum (rather than an open class hierarchy dispatched by downcast) means every
//! consumer matches exhaustively and the compiler flags any newly added kind.
//!
//! [`ClassName`] is the interned binary name of a reference type (`java/lang/String`).
//! Clones are cheap (`Arc<str>`), and the same name value is shared between the type
//! universe, IR nodes, and fallback identities.

use std::fmt;
use std::sync::Arc;

/// Interned binary class name, e.g. `java/lang/String`.
///
/// Displayed in dotted source form (`java.lang.String`). Ordering and equality are
/// on the binary form.
///
/// # Examples
///
/// ```rust
/// use declass::metadata::typesystem::ClassName;
///
/// let name = ClassName::from_binary("java/util/Map$Entry");
/// assert_eq!(name.simple_name(), "Map$Entry");
/// assert_eq!(name.package(), "java.util");
/// assert_eq!(name.to_string(), "java.util.Map$Entry");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(Arc<str>);

impl ClassName {
    /// Creates a class name from its binary (slash-separated) form.
    #[must_use]
    pub fn from_binary(name: &str) -> Self {
        ClassName(Arc::from(name))
    }

    /// Returns the binary (slash-separated) form.
    #[must_use]
    pub fn as_binary(&self) -> &str {
        &self.0
    }

    /// Returns the unqualified name, without the package prefix.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Returns the dotted package name, or the empty string for the default package.
    #[must_use]
    pub fn package(&self) -> String {
        match self.0.rfind('/') {
            Some(idx) => self.0[..idx].replace('/', "."),
            None => String::new(),
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.replace('/', "."))
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An erased Java type as the class file format expresses it.
///
/// This is the static type attached to every IR node through
/// [`super::InferredJavaType`]. Only erased information is represented; generic
/// signatures are out of scope for this layer.
///
/// # Examples
///
/// ```rust
/// use declass::metadata::typesystem::{ClassName, JavaType};
///
/// let strings = JavaType::Reference(ClassName::from_binary("java/lang/String"));
/// let matrix = JavaType::Array(Box::new(JavaType::Array(Box::new(JavaType::Long))));
///
/// assert_eq!(strings.descriptor(), "Ljava/lang/String;");
/// assert_eq!(matrix.descriptor(), "[[J");
/// assert_eq!(matrix.to_string(), "long[][]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `void` (only legal as a method return type)
    Void,
    /// A class or interface reference type
    Reference(ClassName),
    /// An array type; nested arrays model multiple dimensions
    Array(Box<JavaType>),
}

impl JavaType {
    /// Returns `true` for the eight primitive kinds (not `void`, not references).
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        !matches!(
            self,
            JavaType::Void | JavaType::Reference(_) | JavaType::Array(_)
        )
    }

    /// Returns `true` for `boolean`.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, JavaType::Boolean)
    }

    /// Returns `true` for class or interface reference types.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, JavaType::Reference(_))
    }

    /// Returns the referenced class name, if this is a reference type.
    #[must_use]
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            JavaType::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the number of array dimensions (0 for non-arrays).
    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            JavaType::Array(element) => 1 + element.dimensions(),
            _ => 0,
        }
    }

    /// Returns the erased descriptor form of this type, e.g. `I` or `Ljava/lang/String;`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            JavaType::Boolean => "Z".to_string(),
            JavaType::Byte => "B".to_string(),
            JavaType::Char => "C".to_string(),
            JavaType::Short => "S".to_string(),
            JavaType::Int => "I".to_string(),
            JavaType::Long => "J".to_string(),
            JavaType::Float => "F".to_string(),
            JavaType::Double => "D".to_string(),
            JavaType::Void => "V".to_string(),
            JavaType::Reference(name) => format!("L{};", name.as_binary()),
            JavaType::Array(element) => format!("[{}", element.descriptor()),
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Boolean => write!(f, "boolean"),
            JavaType::Byte => write!(f, "byte"),
            JavaType::Char => write!(f, "char"),
            JavaType::Short => write!(f, "short"),
            JavaType::Int => write!(f, "int"),
            JavaType::Long => write!(f, "long"),
            JavaType::Float => write!(f, "float"),
            JavaType::Double => write!(f, "double"),
            JavaType::Void => write!(f, "void"),
            JavaType::Reference(name) => write!(f, "{name}"),
            JavaType::Array(element) => write!(f, "{element}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_parts() {
        let name = ClassName::from_binary("com/example/Outer$Inner");
        assert_eq!(name.as_binary(), "com/example/Outer$Inner");
        assert_eq!(name.simple_name(), "Outer$Inner");
        assert_eq!(name.package(), "com.example");
    }

    #[test]
    fn test_class_name_default_package() {
        let name = ClassName::from_binary("Standalone");
        assert_eq!(name.simple_name(), "Standalone");
        assert_eq!(name.package(), "");
        assert_eq!(name.to_string(), "Standalone");
    }

    #[test]
    fn test_java_type_descriptors() {
        assert_eq!(JavaType::Int.descriptor(), "I");
        assert_eq!(JavaType::Long.descriptor(), "J");
        assert_eq!(JavaType::Boolean.descriptor(), "Z");
        assert_eq!(
            JavaType::Reference(ClassName::from_binary("java/lang/Object")).descriptor(),
            "Ljava/lang/Object;"
        );
        assert_eq!(
            JavaType::Array(Box::new(JavaType::Byte)).descriptor(),
            "[B"
        );
    }

    #[test]
    fn test_java_type_display() {
        let nested = JavaType::Array(Box::new(JavaType::Array(Box::new(JavaType::Reference(
            ClassName::from_binary("java/lang/String"),
        )))));
        assert_eq!(nested.to_string(), "java.lang.String[][]");
        assert_eq!(nested.dimensions(), 2);
    }

    #[test]
    fn test_java_type_predicates() {
        assert!(JavaType::Int.is_primitive());
        assert!(!JavaType::Void.is_primitive());
        assert!(JavaType::Boolean.is_boolean());
        let obj = JavaType::Reference(ClassName::from_binary("java/lang/Object"));
        assert!(obj.is_reference());
        assert_eq!(obj.class_name().unwrap().simple_name(), "Object");
    }
}

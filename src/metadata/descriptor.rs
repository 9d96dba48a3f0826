//! Erased field-descriptor parsing.
//!
//! Field references in the class file carry their type as an erased descriptor string
//! (`I`, `Ljava/lang/String;`, `[[J`). This module turns those into [`JavaType`]
//! values. Malformed descriptors are [`crate::Error::Malformed`]; they only surface at
//! the class-source boundary, where the type universe folds them into the not-loadable
//! outcome.

use crate::metadata::typesystem::{ClassName, JavaType};
use crate::Result;

/// Parses a single erased field descriptor into a [`JavaType`].
///
/// # Arguments
///
/// * `descriptor` - The descriptor string, e.g. `I` or `[Ljava/lang/Object;`
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the descriptor is empty, truncated, uses an
/// unknown base type character, or has trailing characters after a complete type.
///
/// # Examples
///
/// ```rust
/// use declass::metadata::{descriptor::parse_field_descriptor, typesystem::JavaType};
///
/// assert_eq!(parse_field_descriptor("I")?, JavaType::Int);
/// assert_eq!(
///     parse_field_descriptor("[B")?,
///     JavaType::Array(Box::new(JavaType::Byte))
/// );
/// # Ok::<(), declass::Error>(())
/// ```
pub fn parse_field_descriptor(descriptor: &str) -> Result<JavaType> {
    let bytes = descriptor.as_bytes();
    let (ty, consumed) = parse_type_at(descriptor, 0)?;
    if consumed != bytes.len() {
        return Err(malformed_error!(
            "Trailing characters in field descriptor '{}'",
            descriptor
        ));
    }
    Ok(ty)
}

/// Parses one type starting at `offset`, returning it and the offset past its end.
fn parse_type_at(descriptor: &str, offset: usize) -> Result<(JavaType, usize)> {
    let bytes = descriptor.as_bytes();
    let Some(&tag) = bytes.get(offset) else {
        return Err(malformed_error!(
            "Truncated field descriptor '{}'",
            descriptor
        ));
    };

    match tag {
        b'Z' => Ok((JavaType::Boolean, offset + 1)),
        b'B' => Ok((JavaType::Byte, offset + 1)),
        b'C' => Ok((JavaType::Char, offset + 1)),
        b'S' => Ok((JavaType::Short, offset + 1)),
        b'I' => Ok((JavaType::Int, offset + 1)),
        b'J' => Ok((JavaType::Long, offset + 1)),
        b'F' => Ok((JavaType::Float, offset + 1)),
        b'D' => Ok((JavaType::Double, offset + 1)),
        b'V' => Ok((JavaType::Void, offset + 1)),
        b'L' => {
            let Some(end) = descriptor[offset + 1..].find(';') else {
                return Err(malformed_error!(
                    "Unterminated class reference in descriptor '{}'",
                    descriptor
                ));
            };
            let name = &descriptor[offset + 1..offset + 1 + end];
            if name.is_empty() {
                return Err(malformed_error!(
                    "Empty class reference in descriptor '{}'",
                    descriptor
                ));
            }
            Ok((
                JavaType::Reference(ClassName::from_binary(name)),
                offset + 1 + end + 1,
            ))
        }
        b'[' => {
            let (element, next) = parse_type_at(descriptor, offset + 1)?;
            Ok((JavaType::Array(Box::new(element)), next))
        }
        other => Err(malformed_error!(
            "Unknown base type '{}' in descriptor '{}'",
            other as char,
            descriptor
        )),
    }
}

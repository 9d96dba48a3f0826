//! Convenience re-exports of the commonly used surface.
//!
//! ```rust
//! use declass::prelude::*;
//!
//! let universe = TypeUniverse::new(Box::new(MapClassSource::new()));
//! assert_eq!(universe.loaded_class_count(), 0);
//! ```

pub use crate::analysis::ir::{
    ArithOp, ArithmeticMonOperation, ArithmeticOperation, ArrayIndexExpression, BoolOp,
    BooleanExpression, BooleanOperation, CastExpression, CloneHelper, CompOp, ComparisonOperation,
    ConditionalExpression, DefinitionTable, Dumper, Expression, ExpressionRewriter, FieldBinding,
    FieldVariable, LValue, LValueExpression, LValueRewriter, LValueUsageCollector, LValueUsageSet,
    LiteralExpression, LiteralValue, LocalVariable, NotOperation, PlainDumper, Precedence,
    RewriterFlags, SingleUseRewriter, SsaIdentifierFactory, SsaIdentifiers, SsaVersion,
    StatementContainer, TernaryExpression, TypeUsageSink, UnaryArithOp,
};
pub use crate::analysis::units::{run_units, DecompilationUnit, UnitOutcome, UnitResult};
pub use crate::metadata::access::AccessFlags;
pub use crate::metadata::classfile::{
    ClassModel, ClassRc, FieldLookup, FieldModel, FieldRc, FieldRef, InnerClassInfo,
};
pub use crate::metadata::descriptor::parse_field_descriptor;
pub use crate::metadata::typesystem::{
    ClassName, ClassOutcome, ClassSource, InferredJavaType, JavaType, MapClassSource, TypeSource,
    TypeUniverse,
};
pub use crate::{Error, Result};

//! Assignable locations.
//!
//! An [`LValue`] is anything an assignment can target: a local variable slot or an
//! instance field access. Field accesses carry the outcome of resolving their
//! symbolic reference against the [`TypeUniverse`] - resolution is best-effort, and
//! a field whose owning class cannot be loaded degrades to a deterministic fallback
//! built from the erased descriptor rather than failing the decompilation.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::analysis::ir::expression::Expression;
use crate::analysis::ir::output::{Dumper, LValueUsageCollector, TypeUsageSink};
use crate::analysis::ir::precedence::Precedence;
use crate::analysis::ir::rewrite::{
    CloneHelper, ExpressionRewriter, LValueRewriter, RewriterFlags, StatementContainer,
};
use crate::analysis::ir::ssa::SsaIdentifiers;
use crate::metadata::classfile::{is_outer_ref_name, FieldLookup, FieldRc, FieldRef};
use crate::metadata::typesystem::{
    ClassOutcome, InferredJavaType, JavaType, TypeSource, TypeUniverse,
};

/// An assignable location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LValue {
    /// A local variable slot
    Local(LocalVariable),
    /// An instance field access
    Field(FieldVariable),
}

impl LValue {
    /// Returns the layout-cost metric of this location.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            LValue::Local(_) => 1,
            LValue::Field(field) => 1 + field.object.size(),
        }
    }

    /// Returns the precedence a read of this location renders at.
    #[must_use]
    pub fn precedence(&self) -> Precedence {
        match self {
            LValue::Local(_) => Precedence::Strongest,
            LValue::Field(_) => Precedence::ParenSubMember,
        }
    }

    /// Returns the currently-believed type of a read of this location.
    #[must_use]
    pub fn inferred_type(&self) -> &InferredJavaType {
        match self {
            LValue::Local(local) => &local.inferred,
            LValue::Field(field) => &field.inferred,
        }
    }

    /// Emits this location into the sink.
    pub fn dump(&self, d: &mut dyn Dumper) {
        match self {
            LValue::Local(local) => d.identifier(&local.name),
            LValue::Field(field) => {
                // only a synthesized outer reference hides its `this.` prefix;
                // an ordinary field read off the receiver prints in full
                if !(field.is_outer_ref() && field.object_is_this()) {
                    field
                        .object
                        .dump_with_outer_precedence(d, Precedence::ParenSubMember);
                    d.print(".");
                }
                d.identifier(field.field_name());
            }
        }
    }

    /// Reports lvalues nested inside this one (a field access's object expression
    /// may itself read further lvalues). The receiver itself is not reported.
    pub fn collect_inner_lvalues(&self, collector: &mut dyn LValueUsageCollector) {
        match self {
            LValue::Local(_) => {}
            LValue::Field(field) => field.object.collect_used_lvalues(collector),
        }
    }

    /// Reports every type this location directly references.
    pub fn collect_type_usages(&self, sink: &mut TypeUsageSink) {
        match self {
            LValue::Local(local) => sink.collect(local.inferred.java_type()),
            LValue::Field(field) => {
                sink.collect(&JavaType::Reference(field.field_ref.owner().clone()));
                sink.collect(field.inferred.java_type());
                field.object.collect_type_usages(sink);
            }
        }
    }

    /// Single-use substitution inside this location's nested expressions.
    ///
    /// Only the interior is rewritten; the location itself is never substituted
    /// here - replacing a *read* of it is the expression layer's decision.
    #[must_use]
    pub fn replace_single_usage_lvalues(
        self,
        rewriter: &mut dyn LValueRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
    ) -> LValue {
        match self {
            LValue::Local(local) => LValue::Local(local),
            LValue::Field(mut field) => {
                field.object =
                    Box::new(field.object.replace_single_usage_lvalues(rewriter, ssa, container));
                LValue::Field(field)
            }
        }
    }

    /// Generic rewrite protocol applied to this location's nested expressions.
    #[must_use]
    pub fn apply_expression_rewriter(
        self,
        rewriter: &mut dyn ExpressionRewriter,
        ssa: &SsaIdentifiers,
        container: &StatementContainer,
        flags: RewriterFlags,
    ) -> LValue {
        match self {
            LValue::Local(local) => LValue::Local(local),
            LValue::Field(mut field) => {
                field.object = Box::new(rewriter.rewrite_expression(
                    *field.object,
                    ssa,
                    container,
                    flags | RewriterFlags::RVALUE,
                ));
                LValue::Field(field)
            }
        }
    }

    /// Deep clone with the helper's substitution policy.
    #[must_use]
    pub fn deep_clone(&self, helper: &CloneHelper) -> LValue {
        match self {
            LValue::Local(local) => LValue::Local(local.clone()),
            LValue::Field(field) => LValue::Field(FieldVariable {
                object: Box::new(field.object.deep_clone(helper)),
                field_ref: field.field_ref.clone(),
                binding: field.binding.clone(),
                inferred: field.inferred.clone(),
            }),
        }
    }
}

impl From<LocalVariable> for LValue {
    fn from(local: LocalVariable) -> Self {
        LValue::Local(local)
    }
}

impl From<FieldVariable> for LValue {
    fn from(field: FieldVariable) -> Self {
        LValue::Field(field)
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dumper = crate::analysis::ir::output::PlainDumper::new();
        self.dump(&mut dumper);
        write!(f, "{}", dumper.finish())
    }
}

/// A named local variable slot.
///
/// Identity is the name and slot; the inferred type is a mutable belief and takes
/// no part in equality or hashing.
#[derive(Debug, Clone)]
pub struct LocalVariable {
    name: String,
    slot: u16,
    inferred: InferredJavaType,
}

impl LocalVariable {
    /// Creates a local variable.
    #[must_use]
    pub fn new(name: &str, slot: u16, inferred: InferredJavaType) -> Self {
        Self {
            name: name.to_string(),
            slot,
            inferred,
        }
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bytecode slot index.
    #[must_use]
    pub const fn slot(&self) -> u16 {
        self.slot
    }

    /// Returns the currently-believed type.
    #[must_use]
    pub const fn inferred_type(&self) -> &InferredJavaType {
        &self.inferred
    }

    /// Narrows the type belief in place.
    pub fn inferred_type_mut(&mut self) -> &mut InferredJavaType {
        &mut self.inferred
    }

    /// Returns `true` when this is the method's `this` receiver slot.
    #[must_use]
    pub fn is_this(&self) -> bool {
        self.name == "this"
    }
}

impl PartialEq for LocalVariable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.slot == other.slot
    }
}

impl Eq for LocalVariable {}

impl Hash for LocalVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.slot.hash(state);
    }
}

/// How a field access's symbolic reference resolved.
#[derive(Debug, Clone)]
pub enum FieldBinding {
    /// The owning class loaded and declares the field
    Resolved(FieldRc),
    /// The owning class is not loadable or does not declare the field; the erased
    /// reference stands in
    Fallback,
}

impl FieldBinding {
    /// Returns `true` when the reference resolved to a declared field.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, FieldBinding::Resolved(_))
    }
}

/// An instance field access: `object.field`.
///
/// Identity for equality and hashing is the object expression and the field name;
/// whether the reference resolved does not participate, so a resolved access and
/// its fallback twin compare equal.
#[derive(Debug, Clone)]
pub struct FieldVariable {
    object: Box<Expression>,
    field_ref: FieldRef,
    binding: FieldBinding,
    inferred: InferredJavaType,
}

impl FieldVariable {
    /// Resolves a symbolic field reference against the universe.
    ///
    /// The owning class is resolved first; if it loads and declares a field with
    /// the referenced name and descriptor, the access binds to that declaration and
    /// takes its declared type. Otherwise the access degrades to a fallback typed
    /// by the reference's erased descriptor. Never fails: an unloadable universe
    /// produces a well-formed access, just a less precisely typed one.
    #[must_use]
    pub fn resolve(object: Expression, field_ref: &FieldRef, universe: &TypeUniverse) -> Self {
        let binding = match universe.resolve(field_ref.owner()) {
            ClassOutcome::Loaded(class) => {
                match class.find_field(field_ref.name(), field_ref.erased_type()) {
                    FieldLookup::Found(field) => FieldBinding::Resolved(field),
                    FieldLookup::NotFound => FieldBinding::Fallback,
                }
            }
            ClassOutcome::NotLoadable => FieldBinding::Fallback,
        };
        let inferred = match &binding {
            FieldBinding::Resolved(field) => InferredJavaType::new(
                field.declared_type().clone(),
                TypeSource::FieldDeclaration,
            ),
            FieldBinding::Fallback => InferredJavaType::new(
                field_ref.erased_type().clone(),
                TypeSource::UnresolvedReference,
            ),
        };
        Self {
            object: Box::new(object),
            field_ref: field_ref.clone(),
            binding,
            inferred,
        }
    }

    /// Returns the object expression the field is read off.
    #[must_use]
    pub const fn object(&self) -> &Expression {
        &self.object
    }

    /// Returns the symbolic reference this access was built from.
    #[must_use]
    pub const fn field_ref(&self) -> &FieldRef {
        &self.field_ref
    }

    /// Returns how the reference resolved.
    #[must_use]
    pub const fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    /// Returns the currently-believed type of a read of this field.
    #[must_use]
    pub const fn inferred_type(&self) -> &InferredJavaType {
        &self.inferred
    }

    /// Returns the field name. Identical for resolved and fallback accesses.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_ref.name()
    }

    /// Returns `true` when this access reads a compiler-synthesized outer-instance
    /// reference.
    ///
    /// A resolved access asks the declaration (synthetic flag plus `this$N` name,
    /// or a later explicit marking); a fallback access falls back to the name
    /// pattern alone, so the answer stays deterministic when the owning class never
    /// loads.
    #[must_use]
    pub fn is_outer_ref(&self) -> bool {
        match &self.binding {
            FieldBinding::Resolved(field) => field.is_synthetic_outer_ref(),
            FieldBinding::Fallback => is_outer_ref_name(self.field_ref.name()),
        }
    }

    /// Returns `true` when the object expression is a bare read of the `this`
    /// receiver. Display elides the `this.` prefix only for outer-reference
    /// accesses that satisfy this.
    #[must_use]
    pub fn object_is_this(&self) -> bool {
        match &*self.object {
            Expression::LValue(read) => match read.lvalue() {
                LValue::Local(local) => local.is_this(),
                LValue::Field(_) => false,
            },
            _ => false,
        }
    }

    /// Collapses a left-nested chain of synthesized outer references.
    ///
    /// Nested inner classes reach an outer field through a chain of `this$N` hops
    /// (`this$2.this$1.this$0`); only the last hop carries information, so when
    /// this access is itself an outer reference its object repeatedly skips past
    /// any outer-reference read it hangs off. A non-outer-ref access is left
    /// untouched. Idempotent.
    pub fn collapse_nested_outer_refs(&mut self) {
        if !self.is_outer_ref() {
            return;
        }
        loop {
            let next = match &*self.object {
                Expression::LValue(read) => match read.lvalue() {
                    LValue::Field(field) if field.is_outer_ref() => field.object.clone(),
                    _ => break,
                },
                _ => break,
            };
            self.object = next;
        }
    }
}

impl PartialEq for FieldVariable {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object && self.field_name() == other.field_name()
    }
}

impl Eq for FieldVariable {}

impl Hash for FieldVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
        self.field_name().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::access::AccessFlags;
    use crate::metadata::classfile::{ClassModel, FieldModel};
    use crate::metadata::typesystem::{ClassName, MapClassSource};

    fn this_read() -> Expression {
        Expression::lvalue_read(LValue::from(LocalVariable::new(
            "this",
            0,
            InferredJavaType::new(
                JavaType::Reference(ClassName::from_binary("com/example/Outer$Inner")),
                TypeSource::Expression,
            ),
        )))
    }

    fn outer_type(binary: &str) -> JavaType {
        JavaType::Reference(ClassName::from_binary(binary))
    }

    fn universe_with(classes: Vec<ClassModel>) -> TypeUniverse {
        let source = MapClassSource::new();
        for class in classes {
            source.insert(class);
        }
        TypeUniverse::new(Box::new(source))
    }

    fn declaring_class(name: &str, field: &str, ty: JavaType, flags: AccessFlags) -> ClassModel {
        let class = ClassModel::new(ClassName::from_binary(name), None, AccessFlags::PUBLIC);
        class.add_field(FieldModel::new(field, ty, flags));
        class
    }

    #[test]
    fn test_resolve_success_takes_declared_type() {
        let universe = universe_with(vec![declaring_class(
            "com/example/Holder",
            "count",
            JavaType::Boolean,
            AccessFlags::PRIVATE,
        )]);
        let field_ref = FieldRef::new(
            ClassName::from_binary("com/example/Holder"),
            "count",
            JavaType::Boolean,
        );
        let field = FieldVariable::resolve(this_read(), &field_ref, &universe);
        assert!(field.binding().is_resolved());
        assert_eq!(*field.inferred_type().java_type(), JavaType::Boolean);
        assert_eq!(field.inferred_type().source(), TypeSource::FieldDeclaration);
    }

    #[test]
    fn test_resolve_adopts_signature_type_over_erased_reference() {
        // The declaration erases to Object but declares String in its signature.
        // The reference carries the erasure; resolution must bind and take the
        // more specific declared type.
        let string = outer_type("java/lang/String");
        let object = outer_type("java/lang/Object");
        let class = ClassModel::new(
            ClassName::from_binary("com/example/Box"),
            None,
            AccessFlags::PUBLIC,
        );
        class.add_field(FieldModel::with_signature(
            "value",
            object.clone(),
            string.clone(),
            AccessFlags::PRIVATE,
        ));
        let universe = universe_with(vec![class]);

        let field_ref = FieldRef::new(ClassName::from_binary("com/example/Box"), "value", object);
        let field = FieldVariable::resolve(this_read(), &field_ref, &universe);
        assert!(field.binding().is_resolved());
        assert_eq!(*field.inferred_type().java_type(), string);
        assert_eq!(field.inferred_type().source(), TypeSource::FieldDeclaration);
    }

    #[test]
    fn test_resolve_fallback_when_class_missing() {
        let universe = universe_with(vec![]);
        let field_ref = FieldRef::new(
            ClassName::from_binary("com/example/Gone"),
            "value",
            JavaType::Int,
        );
        let field = FieldVariable::resolve(this_read(), &field_ref, &universe);
        assert!(!field.binding().is_resolved());
        assert_eq!(*field.inferred_type().java_type(), JavaType::Int);
        assert_eq!(
            field.inferred_type().source(),
            TypeSource::UnresolvedReference
        );
    }

    #[test]
    fn test_resolution_does_not_affect_equality() {
        let universe = universe_with(vec![declaring_class(
            "com/example/Holder",
            "value",
            JavaType::Int,
            AccessFlags::PRIVATE,
        )]);
        let empty = universe_with(vec![]);
        let field_ref = FieldRef::new(
            ClassName::from_binary("com/example/Holder"),
            "value",
            JavaType::Int,
        );
        let resolved = FieldVariable::resolve(this_read(), &field_ref, &universe);
        let fallback = FieldVariable::resolve(this_read(), &field_ref, &empty);
        assert!(resolved.binding().is_resolved());
        assert!(!fallback.binding().is_resolved());
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn test_outer_ref_detection_resolved_and_fallback() {
        let universe = universe_with(vec![declaring_class(
            "com/example/Outer$Inner",
            "this$0",
            outer_type("com/example/Outer"),
            AccessFlags::SYNTHETIC | AccessFlags::FINAL,
        )]);
        let field_ref = FieldRef::new(
            ClassName::from_binary("com/example/Outer$Inner"),
            "this$0",
            outer_type("com/example/Outer"),
        );
        let resolved = FieldVariable::resolve(this_read(), &field_ref, &universe);
        assert!(resolved.is_outer_ref());

        let fallback = FieldVariable::resolve(this_read(), &field_ref, &universe_with(vec![]));
        assert!(fallback.is_outer_ref());
    }

    #[test]
    fn test_collapse_nested_outer_refs() {
        // this$2.this$1.this$0 collapses so the final hop hangs directly off this
        let empty = universe_with(vec![]);
        let hop = |object: Expression, n: u32, owner: &str, outer: &str| {
            FieldVariable::resolve(
                object,
                &FieldRef::new(
                    ClassName::from_binary(owner),
                    &format!("this${n}"),
                    outer_type(outer),
                ),
                &empty,
            )
        };
        let two = hop(this_read(), 2, "com/example/A$B$C$D", "com/example/A");
        let one = hop(
            Expression::lvalue_read(two.into()),
            1,
            "com/example/A$B$C",
            "com/example/A$B",
        );
        let mut zero = hop(
            Expression::lvalue_read(one.into()),
            0,
            "com/example/A$B",
            "com/example/A$B$C",
        );
        zero.collapse_nested_outer_refs();
        assert!(zero.object_is_this());
        // repeating the collapse changes nothing
        let collapsed = zero.clone();
        zero.collapse_nested_outer_refs();
        assert_eq!(zero, collapsed);
    }

    #[test]
    fn test_collapse_leaves_non_outer_refs_alone() {
        let empty = universe_with(vec![]);
        let outer_hop = FieldVariable::resolve(
            this_read(),
            &FieldRef::new(
                ClassName::from_binary("com/example/Outer$Inner"),
                "this$0",
                outer_type("com/example/Outer"),
            ),
            &empty,
        );
        let mut plain = FieldVariable::resolve(
            Expression::lvalue_read(outer_hop.into()),
            &FieldRef::new(ClassName::from_binary("com/example/Outer"), "x", JavaType::Int),
            &empty,
        );
        let before = plain.clone();
        plain.collapse_nested_outer_refs();
        assert_eq!(plain, before);
    }

    #[test]
    fn test_field_display_elides_this_only_for_outer_refs() {
        let empty = universe_with(vec![]);
        let plain = FieldVariable::resolve(
            this_read(),
            &FieldRef::new(ClassName::from_binary("com/example/Outer"), "x", JavaType::Int),
            &empty,
        );
        assert_eq!(LValue::from(plain).to_string(), "this.x");

        let outer = FieldVariable::resolve(
            this_read(),
            &FieldRef::new(
                ClassName::from_binary("com/example/Outer$Inner"),
                "this$0",
                outer_type("com/example/Outer"),
            ),
            &empty,
        );
        assert_eq!(LValue::from(outer).to_string(), "this$0");
    }

    #[test]
    fn test_local_identity_ignores_type_belief() {
        let a = LocalVariable::new("i", 1, InferredJavaType::new(JavaType::Int, TypeSource::Expression));
        let b = LocalVariable::new(
            "i",
            1,
            InferredJavaType::new(JavaType::Boolean, TypeSource::FieldDeclaration),
        );
        assert_eq!(a, b);
    }
}

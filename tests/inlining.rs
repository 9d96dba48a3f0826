//! Single-use inlining integration tests.
//!
//! These tests verify the SSA substitution pipeline using the public API:
//! 1. Record definitions and uses in a definition table
//! 2. Freeze it into the single-use rewriter
//! 3. Run the substitution traversal over expression trees
//! 4. Verify that composites keep their identity and stale versions block inlining

use declass::prelude::*;

fn int_local(name: &str, slot: u16) -> LValue {
    LValue::from(LocalVariable::new(
        name,
        slot,
        InferredJavaType::new(JavaType::Int, TypeSource::Expression),
    ))
}

fn read(lvalue: &LValue) -> Expression {
    Expression::lvalue_read(lvalue.clone())
}

fn container() -> StatementContainer {
    StatementContainer::new("Demo.compute", 0)
}

#[test]
fn test_temporary_inlines_into_sole_use() {
    // tmp = a * b; result = tmp + c  ==>  result = a * b + c
    let (a, b, c, tmp) = (
        int_local("a", 0),
        int_local("b", 1),
        int_local("c", 2),
        int_local("tmp", 3),
    );
    let defining = Expression::Arithmetic(ArithmeticOperation::new(
        read(&a),
        read(&b),
        ArithOp::Mul,
    ));

    let mut table = DefinitionTable::new();
    table.record_definition(tmp.clone(), SsaVersion::new(0), defining);
    table.record_use(&tmp);
    let mut rewriter = table.into_rewriter();

    let mut ssa = SsaIdentifiers::new();
    ssa.define(tmp.clone(), SsaVersion::new(0));

    let sum = Expression::Arithmetic(ArithmeticOperation::new(
        read(&tmp),
        read(&c),
        ArithOp::Add,
    ));
    let rewritten = sum.replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
    assert_eq!(rewritten.to_string(), "a * b + c");
}

#[test]
fn test_composite_identity_survives_substitution() {
    let (a, tmp) = (int_local("a", 0), int_local("tmp", 1));
    let mut table = DefinitionTable::new();
    table.record_definition(tmp.clone(), SsaVersion::new(0), read(&a));
    table.record_use(&tmp);
    let mut rewriter = table.into_rewriter();

    let mut ssa = SsaIdentifiers::new();
    ssa.define(tmp.clone(), SsaVersion::new(0));

    // the comparison node must come back as a comparison with only its leaf swapped
    let condition: ConditionalExpression =
        ComparisonOperation::new(read(&tmp), Expression::int_literal(0), CompOp::Lt).into();
    let rewritten = condition.replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
    assert!(matches!(rewritten, ConditionalExpression::Comparison(_)));
    assert_eq!(rewritten.to_string(), "a < 0");
}

#[test]
fn test_two_uses_block_inlining() {
    let tmp = int_local("tmp", 0);
    let mut table = DefinitionTable::new();
    table.record_definition(tmp.clone(), SsaVersion::new(0), Expression::int_literal(42));
    table.record_use(&tmp);
    table.record_use(&tmp);
    let mut rewriter = table.into_rewriter();

    let mut ssa = SsaIdentifiers::new();
    ssa.define(tmp.clone(), SsaVersion::new(0));

    let sum = Expression::Arithmetic(ArithmeticOperation::new(
        read(&tmp),
        read(&tmp),
        ArithOp::Add,
    ));
    let rewritten = sum.replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
    assert_eq!(rewritten.to_string(), "tmp + tmp");
}

#[test]
fn test_intervening_redefinition_blocks_inlining() {
    // tmp = 1; tmp = 2; use(tmp) - the first definition must not cross the second
    let tmp = int_local("tmp", 0);
    let mut table = DefinitionTable::new();
    table.record_definition(tmp.clone(), SsaVersion::new(0), Expression::int_literal(1));
    table.record_use(&tmp);
    let mut rewriter = table.into_rewriter();

    let mut ssa = SsaIdentifiers::new();
    ssa.define(tmp.clone(), SsaVersion::new(1));

    let rewritten = read(&tmp).replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
    assert_eq!(rewritten.to_string(), "tmp");
}

#[test]
fn test_merge_at_join_blocks_path_dependent_inlining() {
    let (a, b) = (int_local("a", 0), int_local("b", 1));
    let mut then_view = SsaIdentifiers::new();
    then_view.define(a.clone(), SsaVersion::new(0));
    then_view.define(b.clone(), SsaVersion::new(1));
    let mut else_view = SsaIdentifiers::new();
    else_view.define(a.clone(), SsaVersion::new(0));
    else_view.define(b.clone(), SsaVersion::new(2));

    then_view.merge(&else_view);
    assert!(then_view.is_valid_replacement(&a, SsaVersion::new(0)));
    assert!(!then_view.is_valid_replacement(&b, SsaVersion::new(1)));
    assert!(!then_view.is_valid_replacement(&b, SsaVersion::new(2)));
}

#[test]
fn test_substitution_reaches_field_object_expressions() {
    // tmp.x where tmp has a sole definition: the object expression is rewritten
    let (holder, tmp) = (
        LValue::from(LocalVariable::new(
            "holder",
            0,
            InferredJavaType::new(
                JavaType::Reference(ClassName::from_binary("com/example/Holder")),
                TypeSource::Expression,
            ),
        )),
        LValue::from(LocalVariable::new(
            "tmp",
            1,
            InferredJavaType::new(
                JavaType::Reference(ClassName::from_binary("com/example/Holder")),
                TypeSource::Expression,
            ),
        )),
    );

    let mut table = DefinitionTable::new();
    table.record_definition(tmp.clone(), SsaVersion::new(0), read(&holder));
    table.record_use(&tmp);
    let mut rewriter = table.into_rewriter();

    let mut ssa = SsaIdentifiers::new();
    ssa.define(tmp.clone(), SsaVersion::new(0));

    let universe = TypeUniverse::new(Box::new(MapClassSource::new()));
    let access = FieldVariable::resolve(
        read(&tmp),
        &FieldRef::new(ClassName::from_binary("com/example/Holder"), "x", JavaType::Int),
        &universe,
    );
    let rewritten = Expression::lvalue_read(access.into())
        .replace_single_usage_lvalues(&mut rewriter, &ssa, &container());
    assert_eq!(rewritten.to_string(), "holder.x");
}

#[test]
fn test_deep_clone_with_replacement_substitutes_everywhere() {
    let (a, b) = (int_local("a", 0), int_local("b", 1));
    let tree = Expression::Arithmetic(ArithmeticOperation::new(
        read(&a),
        Expression::Arithmetic(ArithmeticOperation::new(read(&a), read(&b), ArithOp::Add)),
        ArithOp::Mul,
    ));

    let helper = CloneHelper::new().with_replacement(read(&a), Expression::int_literal(5));
    let cloned = tree.deep_clone(&helper);
    assert_eq!(cloned.to_string(), "5 * (5 + b)");
    // the original is untouched
    assert_eq!(tree.to_string(), "a * (a + b)");
}

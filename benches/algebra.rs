//! Benchmarks for the boolean simplification algebra.
//!
//! Tests rewriting performance over conditional trees:
//! - De Morgan application on wide and deep combinations
//! - Negation round trips
//! - Type-driven comparison folding
//! - Full per-unit fixed-point simplification

extern crate declass;

use criterion::{criterion_group, criterion_main, Criterion};
use declass::prelude::*;
use std::hint::black_box;

fn local_read(name: &str, slot: u16, ty: JavaType) -> Expression {
    Expression::lvalue_read(LValue::from(LocalVariable::new(
        name,
        slot,
        InferredJavaType::new(ty, TypeSource::Expression),
    )))
}

fn int_cmp(slot: u16, op: CompOp) -> ConditionalExpression {
    ComparisonOperation::new(
        local_read(&format!("v{slot}"), slot, JavaType::Int),
        Expression::int_literal(i32::from(slot)),
        op,
    )
    .into()
}

/// A left-leaning combination of `width` comparisons, alternating operators.
fn wide_tree(width: u16) -> ConditionalExpression {
    let mut tree = int_cmp(0, CompOp::Lt);
    for slot in 1..width {
        let op = if slot % 2 == 0 { BoolOp::And } else { BoolOp::Or };
        tree = BooleanOperation::new(tree, int_cmp(slot, CompOp::Ge), op).into();
    }
    tree
}

/// Benchmark De Morgan application over a 16-comparison combination.
fn bench_demorgan_wide(c: &mut Criterion) {
    let tree = wide_tree(16);

    c.bench_function("algebra_demorgan_wide", |b| {
        b.iter(|| {
            let pushed = black_box(tree.clone()).get_demorgan_applied(true);
            black_box(pushed)
        });
    });
}

/// Benchmark a full negate-then-normalize round trip.
fn bench_negation_round_trip(c: &mut Criterion) {
    let tree = wide_tree(8);

    c.bench_function("algebra_negation_round_trip", |b| {
        b.iter(|| {
            let back = black_box(tree.clone()).get_negated().get_negated();
            black_box(back)
        });
    });
}

/// Benchmark boolean-constant folding over comparisons against literals.
fn bench_optimise_for_type(c: &mut Criterion) {
    let mut tree: ConditionalExpression = ComparisonOperation::new(
        local_read("flag", 0, JavaType::Boolean),
        Expression::boolean_literal(true),
        CompOp::Eq,
    )
    .into();
    for slot in 1..8u16 {
        tree = BooleanOperation::new(tree, int_cmp(slot, CompOp::Ne), BoolOp::And).into();
    }

    c.bench_function("algebra_optimise_for_type", |b| {
        b.iter(|| {
            let folded = black_box(tree.clone()).optimise_for_type();
            black_box(folded)
        });
    });
}

/// Benchmark the per-unit fixed-point driver on a negated combination.
fn bench_unit_simplify(c: &mut Criterion) {
    let root = Expression::Conditional(NotOperation::new(wide_tree(16)).into());

    c.bench_function("algebra_unit_simplify", |b| {
        b.iter(|| {
            let unit = DecompilationUnit::new("Bench.guard", black_box(root.clone()));
            black_box(unit.simplify().unwrap())
        });
    });
}

/// Benchmark the size metric, which the inliner consults on every candidate.
fn bench_size_metric(c: &mut Criterion) {
    let tree = wide_tree(32);

    c.bench_function("algebra_size_metric", |b| {
        b.iter(|| black_box(black_box(&tree).size()));
    });
}

criterion_group!(
    benches,
    bench_demorgan_wide,
    bench_negation_round_trip,
    bench_optimise_for_type,
    bench_unit_simplify,
    bench_size_metric
);
criterion_main!(benches);

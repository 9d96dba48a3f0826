//! Type universe concurrency integration tests.
//!
//! These tests verify the lazy class registry using the public API:
//! 1. Wrap a class source in a type universe
//! 2. Resolve the same names from many threads at once
//! 3. Verify at-most-once loading, terminal failures and the simple-name index

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use declass::prelude::*;

struct CountingSource {
    inner: MapClassSource,
    loads: Arc<AtomicUsize>,
}

impl ClassSource for CountingSource {
    fn load(&self, name: &ClassName) -> Result<ClassRc> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(name)
    }
}

fn class(binary: &str) -> ClassModel {
    ClassModel::new(ClassName::from_binary(binary), None, AccessFlags::PUBLIC)
}

#[test]
fn test_concurrent_resolution_loads_each_class_at_most_once() {
    let inner = MapClassSource::new();
    for i in 0..8 {
        inner.insert(class(&format!("com/example/Class{i}")));
    }
    let loads = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        inner,
        loads: Arc::clone(&loads),
    };
    let universe = TypeUniverse::new(Box::new(source));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for i in 0..8 {
                    let name = ClassName::from_binary(&format!("com/example/Class{i}"));
                    assert!(universe.resolve(&name).is_loaded());
                }
            });
        }
    });

    assert_eq!(universe.loaded_class_count(), 8);
    // 64 resolutions across 8 threads, but each class was loaded exactly once
    assert_eq!(loads.load(Ordering::SeqCst), 8);
}

#[test]
fn test_not_loadable_outcome_is_terminal() {
    let universe = TypeUniverse::new(Box::new(MapClassSource::new()));
    let name = ClassName::from_binary("com/example/Missing");

    assert!(matches!(universe.resolve(&name), ClassOutcome::NotLoadable));
    // later queries see the same memoized outcome
    assert!(matches!(universe.resolve(&name), ClassOutcome::NotLoadable));
    assert_eq!(universe.loaded_class_count(), 0);
}

#[test]
fn test_loaded_classes_come_back_name_ordered() {
    let source = MapClassSource::new();
    source.insert(class("com/example/Zebra"));
    source.insert(class("com/example/Alpha"));
    source.insert(class("com/example/Mid"));
    let universe = TypeUniverse::new(Box::new(source));

    for name in ["com/example/Zebra", "com/example/Alpha", "com/example/Mid"] {
        assert!(universe.resolve(&ClassName::from_binary(name)).is_loaded());
    }
    let names: Vec<String> = universe
        .loaded_classes()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(
        names,
        ["com.example.Alpha", "com.example.Mid", "com.example.Zebra"]
    );
}

#[test]
fn test_simple_name_index_spans_packages() {
    let source = MapClassSource::new();
    source.insert(class("com/example/util/Builder"));
    source.insert(class("com/example/net/Builder"));
    let universe = TypeUniverse::new(Box::new(source));

    for name in ["com/example/util/Builder", "com/example/net/Builder"] {
        assert!(universe.resolve(&ClassName::from_binary(name)).is_loaded());
    }
    let mut found = universe.find_by_simple_name("Builder");
    found.sort();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].simple_name(), "Builder");
}

#[test]
fn test_parallel_units_share_one_universe() {
    let source = MapClassSource::new();
    let holder = class("com/example/Holder");
    holder.add_field(FieldModel::new("x", JavaType::Int, AccessFlags::PRIVATE));
    source.insert(holder);
    let universe = TypeUniverse::new(Box::new(source));

    // many units resolving the same field against the shared universe
    let units: Vec<DecompilationUnit> = (0..32)
        .map(|i| {
            let this = Expression::lvalue_read(LValue::from(LocalVariable::new(
                "this",
                0,
                InferredJavaType::new(
                    JavaType::Reference(ClassName::from_binary("com/example/Holder")),
                    TypeSource::Expression,
                ),
            )));
            let access = FieldVariable::resolve(
                this,
                &FieldRef::new(
                    ClassName::from_binary("com/example/Holder"),
                    "x",
                    JavaType::Int,
                ),
                &universe,
            );
            DecompilationUnit::new(
                &format!("Holder.method{i}"),
                Expression::lvalue_read(access.into()),
            )
        })
        .collect();

    let results = run_units(units);
    assert_eq!(results.len(), 32);
    for result in &results {
        match &result.outcome {
            UnitOutcome::Simplified(root) => assert_eq!(root.to_string(), "this.x"),
            UnitOutcome::Degraded { reason } => panic!("{} degraded: {reason}", result.name),
        }
    }
    assert_eq!(universe.loaded_class_count(), 1);
}

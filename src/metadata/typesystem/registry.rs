//! The lazily-populated type universe.
//!
//! The [`TypeUniverse`] is the central registry mapping symbolic class names to loaded
//! [`ClassModel`]s, or to a terminal not-loadable outcome when a class cannot be
//! located or fails to parse. It is the one resource shared by all concurrently
//! running decompilation units.
//!
//! # Registry Architecture
//!
//! - **Primary store**: an ordered lock-free `SkipMap` keyed by binary class name,
//!   holding one memoization cell per class ever asked about
//! - **Secondary index**: a concurrent `DashMap` from simple names to the full names
//!   that carry them, populated as classes load
//! - **Memoization**: a `OnceLock` per entry guarantees at-most-once load work per
//!   class identity, even when many units race on the first access
//!
//! # Thread Safety
//!
//! All operations are safe under concurrent access. No ordering is guaranteed between
//! racing first loads, but every racer observes the same winning [`ClassOutcome`],
//! and once an outcome is published it is terminal for the rest of the run: callers
//! cannot distinguish "tried and failed" from "never present", by design.
//!
//! # Examples
//!
//! ```rust
//! use declass::metadata::access::AccessFlags;
//! use declass::metadata::classfile::ClassModel;
//! use declass::metadata::typesystem::{ClassName, ClassOutcome, MapClassSource, TypeUniverse};
//!
//! let source = MapClassSource::new();
//! source.insert(ClassModel::new(
//!     ClassName::from_binary("com/example/A"),
//!     Some(ClassName::from_binary("java/lang/Object")),
//!     AccessFlags::PUBLIC,
//! ));
//!
//! let universe = TypeUniverse::new(Box::new(source));
//! assert!(matches!(
//!     universe.resolve(&ClassName::from_binary("com/example/A")),
//!     ClassOutcome::Loaded(_)
//! ));
//! assert!(matches!(
//!     universe.resolve(&ClassName::from_binary("com/example/B")),
//!     ClassOutcome::NotLoadable
//! ));
//! ```

use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::metadata::classfile::{ClassModel, ClassRc};
use crate::metadata::typesystem::ClassName;
use crate::Result;

/// Provider of class models, implemented by the container-reading layer.
///
/// This is a collaborator boundary: the universe consumes whatever source the
/// embedder supplies (a jar scanner, a directory walker, an in-memory map). Any
/// `Err` the source returns - file missing, malformed metadata, I/O failure -
/// folds into [`ClassOutcome::NotLoadable`]; the distinction never reaches the IR.
pub trait ClassSource: Send + Sync {
    /// Loads the class with the given binary name.
    ///
    /// # Errors
    ///
    /// Any error means the class is not loadable; the universe records the outcome
    /// as terminal and will not retry.
    fn load(&self, name: &ClassName) -> Result<ClassRc>;
}

impl<F> ClassSource for F
where
    F: Fn(&ClassName) -> Result<ClassRc> + Send + Sync,
{
    fn load(&self, name: &ClassName) -> Result<ClassRc> {
        self(name)
    }
}

/// Terminal outcome of asking the universe for a class.
///
/// Both variants are permanent for the rest of the run. "Not yet tried" is never
/// observable; the first `resolve` call for a name performs the load.
#[derive(Debug, Clone)]
pub enum ClassOutcome {
    /// The class loaded; the model is shared for the whole run
    Loaded(ClassRc),
    /// The class could not be located or failed to parse
    NotLoadable,
}

impl ClassOutcome {
    /// Returns the loaded model, if any.
    #[must_use]
    pub fn class(&self) -> Option<&ClassRc> {
        match self {
            ClassOutcome::Loaded(class) => Some(class),
            ClassOutcome::NotLoadable => None,
        }
    }

    /// Returns `true` if the class loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, ClassOutcome::Loaded(_))
    }
}

/// Memoization cell for one class identity.
struct ClassEntry {
    cell: OnceLock<ClassOutcome>,
}

/// The lazily-populated registry of loaded class models.
///
/// See the [module documentation](self) for architecture and concurrency notes.
pub struct TypeUniverse {
    source: Box<dyn ClassSource>,
    entries: SkipMap<ClassName, Arc<ClassEntry>>,
    simple_names: DashMap<String, Vec<ClassName>>,
}

impl TypeUniverse {
    /// Creates a universe backed by the given class source.
    #[must_use]
    pub fn new(source: Box<dyn ClassSource>) -> Self {
        Self {
            source,
            entries: SkipMap::new(),
            simple_names: DashMap::new(),
        }
    }

    /// Resolves a class name to its terminal outcome, loading at most once.
    ///
    /// Concurrent first accesses to the same name perform the load exactly once;
    /// every caller observes the same outcome, now and for the rest of the run.
    #[must_use]
    pub fn resolve(&self, name: &ClassName) -> ClassOutcome {
        let entry = self.entries.get_or_insert_with(name.clone(), || {
            Arc::new(ClassEntry {
                cell: OnceLock::new(),
            })
        });

        entry
            .value()
            .cell
            .get_or_init(|| match self.source.load(name) {
                Ok(class) => {
                    self.simple_names
                        .entry(name.simple_name().to_string())
                        .or_default()
                        .push(name.clone());
                    ClassOutcome::Loaded(class)
                }
                Err(_) => ClassOutcome::NotLoadable,
            })
            .clone()
    }

    /// Returns the number of classes that loaded successfully so far.
    #[must_use]
    pub fn loaded_class_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .cell
                    .get()
                    .is_some_and(ClassOutcome::is_loaded)
            })
            .count()
    }

    /// Returns the successfully loaded classes in name order.
    ///
    /// Deterministic regardless of which units raced which loads; used for
    /// end-of-run reporting.
    #[must_use]
    pub fn loaded_classes(&self) -> Vec<ClassRc> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .cell
                    .get()
                    .and_then(ClassOutcome::class)
                    .cloned()
            })
            .collect()
    }

    /// Returns the full names of loaded classes carrying the given simple name.
    #[must_use]
    pub fn find_by_simple_name(&self, simple_name: &str) -> Vec<ClassName> {
        self.simple_names
            .get(simple_name)
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for TypeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeUniverse")
            .field("entries", &self.entries.len())
            .field("loaded", &self.loaded_class_count())
            .finish()
    }
}

/// In-memory class source backed by a concurrent map.
///
/// Used by tests and by embedders that materialize models up front instead of
/// streaming them from a container.
#[derive(Default)]
pub struct MapClassSource {
    classes: DashMap<ClassName, ClassRc>,
}

impl MapClassSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class model, returning the shared handle.
    pub fn insert(&self, class: ClassModel) -> ClassRc {
        let class = Arc::new(class);
        self.classes.insert(class.name().clone(), class.clone());
        class
    }
}

impl ClassSource for MapClassSource {
    fn load(&self, name: &ClassName) -> Result<ClassRc> {
        self.classes
            .get(name)
            .map(|class| class.clone())
            .ok_or_else(|| crate::Error::Error(format!("Class not found - {name}")))
    }
}

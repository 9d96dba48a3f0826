use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! invariant_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvariantViolation {
            invariant: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvariantViolation {
            invariant: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while loading class models
/// and simplifying the expression IR. Each variant provides specific context about the
/// failure mode to enable appropriate error handling.
///
/// Note that an *unresolvable reference* (a class or field that cannot be located in the
/// [`crate::metadata::typesystem::TypeUniverse`]) is deliberately **not** an error: resolution
/// failure degrades precision but always produces a usable IR node. Only genuine defects and
/// malformed inputs surface here.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - Corrupted or inconsistent class metadata
/// - [`Error::FileError`] - Filesystem I/O errors from a class source
///
/// ## Analysis Errors
/// - [`Error::InvariantViolation`] - An internal IR invariant did not hold; fatal to the
///   single decompilation unit being processed, never to the whole run
/// - [`Error::RecursionLimit`] - Maximum rewriting depth/iteration count exceeded
///
/// # Examples
///
/// ```rust
/// use declass::{analysis::units::{run_units, DecompilationUnit, UnitOutcome}, Error};
///
/// # let units: Vec<DecompilationUnit> = Vec::new();
/// for result in run_units(units) {
///     match result.outcome {
///         UnitOutcome::Simplified(_) => println!("{} ok", result.name),
///         UnitOutcome::Degraded { reason } => eprintln!("{} degraded: {}", result.name, reason),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The class metadata is damaged or inconsistent and could not be used.
    ///
    /// This error indicates that a class source handed back metadata that does not
    /// conform to the class-file model, such as a field descriptor that cannot be
    /// parsed. The error includes the source location where the malformation was
    /// detected for debugging purposes.
    ///
    /// At the [`crate::metadata::typesystem::TypeUniverse`] boundary this folds into
    /// the not-loadable outcome rather than propagating.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An internal invariant of the IR did not hold.
    ///
    /// This is a defect, not a runtime input error - for example an operator value
    /// that escaped its closed set, or a query reaching a node that has no meaningful
    /// answer for it. The fault is carried as a value naming the violated invariant so
    /// the outer driver can abandon the single decompilation unit and substitute a
    /// degraded rendering, without crashing the process or aborting the run.
    ///
    /// # Fields
    ///
    /// * `invariant` - Description of the invariant that was violated
    /// * `file` - Source file in which the violation was detected
    /// * `line` - Source line in which the violation was detected
    #[error("Invariant violated - {file}:{line}: {invariant}")]
    InvariantViolation {
        /// Description of the violated invariant
        invariant: String,
        /// The source file in which this violation was detected
        file: &'static str,
        /// The source line in which this violation was detected
        line: u32,
    },

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while a class source reads
    /// class data from disk, such as permission issues or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external failures with additional context.
    #[error("{0}")]
    Error(String),

    /// Recursion limit reached.
    ///
    /// To prevent runaway rewriting, the per-unit simplification driver enforces a
    /// maximum number of fixed-point iterations. Reaching it means a rewriting pass
    /// keeps producing new trees instead of converging, which is treated as a defect
    /// of the pass rather than of the input.
    ///
    /// The associated value shows the iteration limit that was reached.
    #[error("Reached the maximum rewriting iteration count allowed - {0}")]
    RecursionLimit(usize),
}

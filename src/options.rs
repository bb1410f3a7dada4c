//! Compilation options.
//!
//! Options are plain values passed to [`compile`](crate::compile) and carried
//! by the resulting validator. Nothing here is global, so validators compiled
//! with different policies can coexist in one process.

/// How generated code reacts to a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Report the first failure and stop validating.
    #[default]
    StopAtFirst,
    /// Keep validating and report every failure.
    AccumulateAll,
}

/// Options fixed for the duration of one compilation.
///
/// # Example
///
/// ```rust
/// use depgen::{CompileOptions, ErrorPolicy};
///
/// let options = CompileOptions::new()
///     .all_errors(true)
///     .own_properties(true);
///
/// assert_eq!(options.policy(), ErrorPolicy::AccumulateAll);
/// assert!(options.is_own_properties());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    own_properties: bool,
    error_policy: ErrorPolicy,
    max_depth: usize,
}

impl CompileOptions {
    /// Default options: inherited properties count as present, stop at the
    /// first error, schemas may nest 100 levels deep.
    pub fn new() -> Self {
        Self {
            own_properties: false,
            error_policy: ErrorPolicy::StopAtFirst,
            max_depth: 100,
        }
    }

    /// Only treat an object's own properties as present.
    pub fn own_properties(mut self, own_properties: bool) -> Self {
        self.own_properties = own_properties;
        self
    }

    /// Shorthand for choosing between the two error policies.
    pub fn all_errors(mut self, all_errors: bool) -> Self {
        self.error_policy = if all_errors {
            ErrorPolicy::AccumulateAll
        } else {
            ErrorPolicy::StopAtFirst
        };
        self
    }

    /// Sets the error policy.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Sets the maximum schema nesting depth accepted by the compiler.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns true if only own properties count as present.
    pub fn is_own_properties(&self) -> bool {
        self.own_properties
    }

    /// Returns the configured error policy.
    pub fn policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Returns true if every failure is reported.
    pub fn is_all_errors(&self) -> bool {
        self.error_policy == ErrorPolicy::AccumulateAll
    }

    /// Returns the maximum schema nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

//! Core traits
//!
//! Keep them simple - embedded callers don't need complex abstractions.

/// Trait for values that can be checked before entering a filter window
pub trait Validatable {
    /// Check if the value is a usable number (not NaN, infinite, etc)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

//! Input validation utilities
//!
//! Validation functions for pipeline parameters and benchmark options with
//! consistent error messages, returning structured errors from [`crate::errors`].

use crate::errors::{HashfarmError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use hashfarm_lib::validation::validate_positive;
///
/// validate_positive(4, "workers").unwrap();
///
/// let result = validate_positive(0, "queue-capacity");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(HashfarmError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}

/// Validate that a value is not negative (>= 0)
///
/// # Errors
/// Returns an error if the value is negative
pub fn validate_non_negative(value: i32, name: &str) -> Result<()> {
    if value < 0 {
        return Err(HashfarmError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be >= 0, got: {value}"),
        });
    }
    Ok(())
}

/// Validate that `min_val <= max_val`
///
/// # Errors
/// Returns an error if `max_val < min_val`
///
/// # Example
/// ```
/// use hashfarm_lib::validation::validate_min_max;
///
/// validate_min_max(0, 100, "min", "max").unwrap();
/// assert!(validate_min_max(10, 5, "min", "max").is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_min_max<T: Ord + Display>(
    min_val: T,
    max_val: T,
    min_name: &str,
    max_name: &str,
) -> Result<()> {
    if max_val < min_val {
        return Err(HashfarmError::InvalidParameter {
            parameter: max_name.to_string(),
            reason: format!("{max_name} ({max_val}) must be >= {min_name} ({min_val})"),
        });
    }
    Ok(())
}

/// Validate that a directory exists
///
/// # Errors
/// Returns an error if the path does not exist or is not a directory
pub fn validate_dir_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_dir() {
        return Err(HashfarmError::InvalidParameter {
            parameter: description.to_string(),
            reason: format!("Directory does not exist: {}", path_ref.display()),
        });
    }
    Ok(())
}

//! Guards applied before and after store calls.

use crate::Error;

/// Passes `value` through, or fails with [`Error::BadRequest`] naming `field`.
pub fn check_not_null<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::missing(field))
}

/// Passes `value` through, or fails with [`Error::NotFound`].
pub fn check_found<T>(value: Option<T>) -> Result<T, Error> {
    value.ok_or(Error::NotFound)
}

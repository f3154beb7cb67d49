//! Shared error types and the two-sided [`Either`] container.
//!
//! Errors that belong to a single stage live next to that stage
//! ([`crate::buffer::BufferError`], [`crate::evaluator::EvalError`], ...).
//! The types here are the small, named failure conditions several stages share.

use thiserror::Error;

/// Access to a payload that is not there.
///
/// Returned when a lookup that the caller expected to succeed comes back empty,
/// e.g. asking the operator registry for a name it does not know, or reading the
/// text of a token that carries none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`get` on an empty option: {what}")]
pub struct EmptyOption {
    pub what: String,
}

impl EmptyOption {
    pub fn new(what: impl Into<String>) -> Self {
        EmptyOption { what: what.into() }
    }
}

/// Wrong-side access of an [`Either`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EitherError {
    #[error("Either does not hold a `left` value")]
    NotLeft,
    #[error("Either does not hold a `right` value")]
    NotRight,
}

/// A value that is exactly one of two things.
///
/// Reading the side that is not present is an explicit [`EitherError`] rather than
/// a panic, so callers that *assume* a side get a result they must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(&self) -> Result<&L, EitherError> {
        match self {
            Either::Left(l) => Ok(l),
            Either::Right(_) => Err(EitherError::NotLeft),
        }
    }

    pub fn right(&self) -> Result<&R, EitherError> {
        match self {
            Either::Right(r) => Ok(r),
            Either::Left(_) => Err(EitherError::NotRight),
        }
    }

    /// Collapse both sides into one value.
    pub fn fold<T>(&self, on_left: impl FnOnce(&L) -> T, on_right: impl FnOnce(&R) -> T) -> T {
        match self {
            Either::Left(l) => on_left(l),
            Either::Right(r) => on_right(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_sides() {
        let a: Either<i32, f32> = Either::Left(10);
        assert!(a.is_left());
        assert_eq!(a.left(), Ok(&10));
        assert_eq!(a.right(), Err(EitherError::NotRight));
        assert!(a.fold(|_| true, |_| false));

        let b: Either<i32, f32> = Either::Right(11.5);
        assert!(b.is_right());
        assert_eq!(b.left(), Err(EitherError::NotLeft));
        assert_eq!(b.right(), Ok(&11.5));
    }

    #[test]
    fn test_empty_option_message() {
        let err = EmptyOption::new("operator `max`");
        assert_eq!(err.to_string(), "`get` on an empty option: operator `max`");
    }
}

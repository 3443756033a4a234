//! # Notification
//!
//! Result wrapper for fallible domain operations, carrying either a
//! success value or a list of human-readable error messages.
//!
//! ## Why Not Plain Result?
//! Service-level operations (sell, report) can fail for several reasons at
//! once and the presentation layer needs actionable text, not error enums.
//! Typed errors still exist underneath (`CoreError`, the db layer's
//! `DbError`); `Notification` is the translation boundary where they become
//! messages. Nothing is ever swallowed or only printed to a diagnostic
//! stream.

use serde::{Deserialize, Serialize};

use crate::types::Book;

/// The result wrapper for sale operations.
pub type SaleNotification = Notification<Book>;

/// Either a success value or one or more human-readable error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification<T> {
    result: Option<T>,
    errors: Vec<String>,
}

impl<T> Notification<T> {
    /// A successful notification carrying `value`.
    pub fn success(value: T) -> Self {
        Notification {
            result: Some(value),
            errors: Vec::new(),
        }
    }

    /// A failed notification with a single message.
    pub fn failure(message: impl Into<String>) -> Self {
        Notification {
            result: None,
            errors: vec![message.into()],
        }
    }

    /// Appends an error message.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Whether any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The success value, if any.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// The recorded error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the notification into a standard Result.
    pub fn into_result(self) -> Result<T, Vec<String>> {
        match self.result {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let n = Notification::success(42);
        assert!(!n.has_errors());
        assert_eq!(n.result(), Some(&42));
        assert_eq!(n.into_result(), Ok(42));
    }

    #[test]
    fn test_failure() {
        let n: Notification<i32> = Notification::failure("insufficient stock");
        assert!(n.has_errors());
        assert!(n.result().is_none());
        assert_eq!(n.errors(), ["insufficient stock"]);
    }

    #[test]
    fn test_accumulates_errors() {
        let mut n: Notification<i32> = Notification::failure("first");
        n.add_error("second");
        assert_eq!(n.into_result(), Err(vec!["first".to_string(), "second".to_string()]));
    }
}

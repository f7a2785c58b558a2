//! Kernel status codes
//!
//! All kernel statuses are translated here and nowhere else.

use crate::error::{Error, Result};

/// How a status code is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Mapped to [`Error::OutOfMemory`]
    OutOfMemory,
    /// Mapped to [`Error::OperationFailed`]
    Failed,
}

/// One row of the status table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: i32,
    pub kind: StatusKind,
    pub description: &'static str,
}

/// Known non-zero kernel statuses
pub static STATUS_TABLE: &[StatusEntry] = &[
    StatusEntry {
        code: -2,
        kind: StatusKind::Failed,
        description: "unspecified kernel error",
    },
    StatusEntry {
        code: -5,
        kind: StatusKind::Failed,
        description: "bad argument",
    },
    StatusEntry {
        code: -6,
        kind: StatusKind::Failed,
        description: "invalid size",
    },
    StatusEntry {
        code: -8,
        kind: StatusKind::Failed,
        description: "null pointer",
    },
    StatusEntry {
        code: -9,
        kind: StatusKind::OutOfMemory,
        description: "memory allocation failed",
    },
    StatusEntry {
        code: -14,
        kind: StatusKind::Failed,
        description: "invalid stride",
    },
];

/// Look up a status code in [`STATUS_TABLE`].
pub fn lookup(code: i32) -> Option<&'static StatusEntry> {
    STATUS_TABLE.iter().find(|e| e.code == code)
}

/// Translate a kernel status into a `Result`.
///
/// `0` is success. Codes missing from the table become
/// [`Error::OperationFailed`] with reason `"unknown status"`; the original
/// code is always preserved.
pub fn check_status(operation: &'static str, code: i32) -> Result<()> {
    if code == 0 {
        return Ok(());
    }
    let (kind, reason) = match lookup(code) {
        Some(entry) => (entry.kind, entry.description),
        None => (StatusKind::Failed, "unknown status"),
    };
    log::debug!("kernel {operation} returned {code} ({reason})");
    Err(match kind {
        StatusKind::OutOfMemory => Error::OutOfMemory { operation },
        StatusKind::Failed => Error::OperationFailed {
            operation,
            code,
            reason,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        assert_eq!(check_status("otsu", 0), Ok(()));
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(
            check_status("canny", -5),
            Err(Error::OperationFailed {
                operation: "canny",
                code: -5,
                reason: "bad argument",
            })
        );
        assert_eq!(
            check_status("hog", -9),
            Err(Error::OutOfMemory { operation: "hog" })
        );
    }

    #[test]
    fn test_unknown_code_keeps_value() {
        assert_eq!(
            check_status("color_key", 42),
            Err(Error::OperationFailed {
                operation: "color_key",
                code: 42,
                reason: "unknown status",
            })
        );
    }

    #[test]
    fn test_table_has_unique_nonzero_codes() {
        for (i, a) in STATUS_TABLE.iter().enumerate() {
            assert_ne!(a.code, 0);
            assert!(STATUS_TABLE[i + 1..].iter().all(|b| b.code != a.code));
        }
    }
}

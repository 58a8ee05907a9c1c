//! Purchase audit log
//!
//! One line per completed checkout, appended to a plain text file:
//!
//! ```text
//! 2024-05-01T10:00:00Z,Laptop x1 = 999.99; Mouse x2 = 99.98,1099.97,Fast delivery
//! ```
//!
//! Fields containing a comma or a double quote are quoted the way CSV does,
//! with embedded quotes doubled. Line breaks in feedback become spaces.

use std::{
    borrow::Cow,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use emporium::orders::Purchase;
use thiserror::Error;
use tracing::debug;

/// Errors raised while appending to the audit log.
#[derive(Debug, Error)]
#[error("failed to append to {}: {source}", path.display())]
pub struct AuditError {
    path: PathBuf,
    source: io::Error,
}

/// Append-only purchase log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Create a log writing to `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line describing `purchase`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] if the file cannot be opened or written.
    pub fn append(&self, purchase: &Purchase) -> Result<(), AuditError> {
        let audit_error = |source| AuditError {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(audit_error)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(audit_error)?;

        writeln!(file, "{}", format_line(purchase)).map_err(audit_error)?;

        debug!(path = %self.path.display(), "appended purchase to audit log");

        Ok(())
    }
}

/// Render a purchase as a single audit line.
pub fn format_line(purchase: &Purchase) -> String {
    let items = purchase
        .items
        .iter()
        .map(|item| format!("{} x{} = {}", item.name, item.quantity, item.line_total))
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "{},{},{},{}",
        purchase.date,
        quote_field(&items),
        purchase.total_price,
        quote_field(&single_line(&purchase.feedback))
    )
}

fn quote_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

//! Diagnostics
//!
//! Non-fatal findings collected while compiling. Fatal problems are
//! [`TypegenError`](crate::TypegenError)s instead; nothing here stops output.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::reference::Reference;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// `$ref` sits next to `type`/`properties`, which are ignored
    RefSiblingsIgnored,
    /// oneOf/anyOf/allOf present but not compiled
    CompositionIgnored,
    /// `required` lists a key with no matching property
    UnknownRequired,
    /// A `definitions` entry no `$ref` points at
    UnusedDefinition,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefSiblingsIgnored => "W001",
            Self::CompositionIgnored => "W002",
            Self::UnknownRequired => "W003",
            Self::UnusedDefinition => "I001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::RefSiblingsIgnored | Self::CompositionIgnored | Self::UnknownRequired => {
                Severity::Warning
            }
            Self::UnusedDefinition => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Node that caused this diagnostic, as a JSON pointer
    pub reference: String,
    pub code: DiagnosticCode,
    pub message: String,
}

impl DiagnosticItem {
    pub fn new(reference: &Reference, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            reference: reference.to_pointer(),
            code,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.reference
        )
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from one compilation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DiagnosticItem) {
        if item.severity() == Severity::Warning {
            warn!(code = %item.code, reference = %item.reference, "{}", item.message);
        }
        self.items.push(item);
    }

    pub fn ref_siblings_ignored(&mut self, reference: &Reference) {
        self.push(DiagnosticItem::new(
            reference,
            DiagnosticCode::RefSiblingsIgnored,
            "`$ref` takes precedence; sibling `type`/`properties` are ignored",
        ));
    }

    pub fn composition_ignored(&mut self, reference: &Reference) {
        self.push(DiagnosticItem::new(
            reference,
            DiagnosticCode::CompositionIgnored,
            "oneOf/anyOf/allOf are not compiled",
        ));
    }

    pub fn unknown_required(&mut self, reference: &Reference, key: &str) {
        self.push(DiagnosticItem::new(
            reference,
            DiagnosticCode::UnknownRequired,
            format!("required key '{}' has no matching property", key),
        ));
    }

    pub fn unused_definition(&mut self, reference: &Reference) {
        self.push(DiagnosticItem::new(
            reference,
            DiagnosticCode::UnusedDefinition,
            "definition is never referenced",
        ));
    }

    /// Get all warnings
    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.code == code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();
        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }
        if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }
        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

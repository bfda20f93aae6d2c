//! Data models for scan results.
//!
//! A `ScanResult` pairs a source-level `Declaration` with the annotation the
//! analysis routine attached to it. These values are produced once and never
//! mutated by the pipeline.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Kind of a source-level declaration.
///
/// The variant order is part of the result ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Struct,
    Enum,
    EnumElement,
    Protocol,
    Extension,
    Typealias,
    AssociatedType,
    Function,
    Method,
    Initializer,
    Property,
    Variable,
    Parameter,
    GenericParameter,
    Module,
    Import,
}

impl DeclarationKind {
    /// Stable identifier used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Enum => "enum",
            DeclarationKind::EnumElement => "enum_element",
            DeclarationKind::Protocol => "protocol",
            DeclarationKind::Extension => "extension",
            DeclarationKind::Typealias => "typealias",
            DeclarationKind::AssociatedType => "associated_type",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Initializer => "initializer",
            DeclarationKind::Property => "property",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::GenericParameter => "generic_parameter",
            DeclarationKind::Module => "module",
            DeclarationKind::Import => "import",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationKind::Class => "Class",
            DeclarationKind::Struct => "Struct",
            DeclarationKind::Enum => "Enum",
            DeclarationKind::EnumElement => "Enum case",
            DeclarationKind::Protocol => "Protocol",
            DeclarationKind::Extension => "Extension",
            DeclarationKind::Typealias => "Typealias",
            DeclarationKind::AssociatedType => "Associated type",
            DeclarationKind::Function => "Function",
            DeclarationKind::Method => "Method",
            DeclarationKind::Initializer => "Initializer",
            DeclarationKind::Property => "Property",
            DeclarationKind::Variable => "Variable",
            DeclarationKind::Parameter => "Parameter",
            DeclarationKind::GenericParameter => "Generic parameter",
            DeclarationKind::Module => "Module",
            DeclarationKind::Import => "Import",
        };
        write!(f, "{}", name)
    }
}

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the analysis routine.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Identity of a source-level symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub location: Location,
    /// Set when the declaration carries an ignore comment command.
    #[serde(default)]
    pub suppressed: bool,
}

impl Declaration {
    /// Ordering key: file, line, column, kind, name, then the suppressed flag.
    fn sort_key(&self) -> (&str, usize, usize, DeclarationKind, &str, bool) {
        (
            &self.location.file,
            self.location.line,
            self.location.column,
            self.kind,
            &self.name,
            self.suppressed,
        )
    }
}

impl Ord for Declaration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Declaration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What the analysis routine concluded about a declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    Unused,
    AssignOnlyProperty,
    RedundantProtocol,
    RedundantPublicAccessibility {
        #[serde(default)]
        modules: Vec<String>,
    },
}

impl Annotation {
    /// Short machine-readable hint name.
    pub fn hint(&self) -> &'static str {
        match self {
            Annotation::Unused => "unused",
            Annotation::AssignOnlyProperty => "assignOnlyProperty",
            Annotation::RedundantProtocol => "redundantProtocol",
            Annotation::RedundantPublicAccessibility { .. } => "redundantPublicAccessibility",
        }
    }
}

/// A declaration paired with its computed usage status.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScanResult {
    pub declaration: Declaration,
    pub annotation: Annotation,
}

impl ScanResult {
    /// Human-readable description, e.g. `Class 'Foo' is unused`.
    pub fn description(&self) -> String {
        let subject = format!("{} '{}'", self.declaration.kind, self.declaration.name);

        match &self.annotation {
            Annotation::Unused => format!("{} is unused", subject),
            Annotation::AssignOnlyProperty => format!("{} is assigned, but never used", subject),
            Annotation::RedundantProtocol => format!(
                "{} is redundant as it's never used as an existential type",
                subject
            ),
            Annotation::RedundantPublicAccessibility { modules } if modules.is_empty() => {
                format!("{} is declared public, but not used outside its module", subject)
            }
            Annotation::RedundantPublicAccessibility { modules } => format!(
                "{} is declared public, but not used outside of {}",
                subject,
                modules.join(", ")
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn result(file: &str, line: usize, kind: DeclarationKind, name: &str) -> ScanResult {
        ScanResult {
            declaration: Declaration {
                kind,
                name: name.to_string(),
                location: Location {
                    file: file.to_string(),
                    line,
                    column: 1,
                },
                suppressed: false,
            },
            annotation: Annotation::Unused,
        }
    }

    pub fn suppressed(file: &str, line: usize, kind: DeclarationKind, name: &str) -> ScanResult {
        let mut result = result(file, line, kind, name);
        result.declaration.suppressed = true;
        result
    }
}

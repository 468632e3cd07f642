//! Structural validation of a loaded document.
//!
//! Validation is separate from parsing: a hand-edited document should
//! produce a precise diagnostic, not a serde error. Orphaned elements
//! (in the pool, referenced by no column) are legal and reported by
//! [`SiteDocument::orphaned_elements`] instead.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::SiteDocument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("duplicate element id: {0}")]
    DuplicateElementId(String),

    #[error("duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("column {column_id} references unknown element {element_id}")]
    UnknownElementReference {
        column_id: String,
        element_id: String,
    },

    #[error("element {element_id} is referenced by more than one column")]
    ElementReferencedTwice { element_id: String },
}

impl SiteDocument {
    /// Check the document's referential invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut element_ids = HashSet::new();
        for el in &self.elements {
            if !element_ids.insert(el.id.as_str()) {
                return Err(ValidationError::DuplicateElementId(el.id.clone()));
            }
        }

        let mut column_ids = HashSet::new();
        let mut referenced = HashSet::new();
        for col in &self.layout.main.columns {
            if !column_ids.insert(col.id.as_str()) {
                return Err(ValidationError::DuplicateColumnId(col.id.clone()));
            }
            for id in &col.elements {
                if !element_ids.contains(id.as_str()) {
                    return Err(ValidationError::UnknownElementReference {
                        column_id: col.id.clone(),
                        element_id: id.clone(),
                    });
                }
                if !referenced.insert(id.as_str()) {
                    return Err(ValidationError::ElementReferencedTwice {
                        element_id: id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

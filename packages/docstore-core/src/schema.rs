//! Declarative schemas checked against candidate documents.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::document::{json_type_name, Document};
use crate::error::{ValidationError, Violation};

/// Primitive type a declared field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    /// Whether a JSON value inhabits this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    ty: FieldType,
    required: bool,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Declared shape of one collection's documents.
///
/// Validation checks only the declared fields; anything else in a
/// document passes through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Schema { fields: Vec::new() }
    }

    /// Declares a field that must be present, non-null and of `ty`.
    pub fn required(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name,
            ty,
            required: true,
        });
        self
    }

    /// Declares a field that may be absent but must be of `ty` when present.
    pub fn optional(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name,
            ty,
            required: false,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Checks `doc` against every declared field and reports all
    /// violations at once, keyed by field name.
    ///
    /// A null value counts as absent. String fields must be non-empty.
    pub fn validate(&self, doc: &Document) -> Result<(), ValidationError> {
        let mut violations = BTreeMap::new();
        for spec in &self.fields {
            let violation = match doc.get(spec.name) {
                None | Some(Value::Null) => spec.required.then_some(Violation::Missing),
                Some(value) if !spec.ty.matches(value) => Some(Violation::TypeMismatch {
                    expected: spec.ty,
                    got: json_type_name(value),
                }),
                Some(Value::String(text)) if text.is_empty() => Some(Violation::Empty),
                Some(_) => None,
            };
            if let Some(violation) = violation {
                violations.insert(spec.name.to_string(), violation);
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

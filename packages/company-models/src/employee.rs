//! The employee record and its schema.

use serde::{Deserialize, Serialize};

use docstore_core::{DocumentId, FieldType, Model, Schema};

/// One employee document.
///
/// Serialized field names follow the stored camelCase form. The
/// identity is assigned by the store on first insert and omitted
/// while unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<DocumentId>,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl Employee {
    /// New, unsaved employee.
    pub fn new(first_name: &str, last_name: &str, department: &str) -> Self {
        Employee {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            department: department.to_string(),
        }
    }
}

impl Model for Employee {
    const COLLECTION: &'static str = "employees";

    fn schema() -> Schema {
        Schema::new()
            .required("firstName", FieldType::String)
            .required("lastName", FieldType::String)
            .required("department", FieldType::String)
    }

    fn id(&self) -> Option<DocumentId> {
        self.id
    }
}

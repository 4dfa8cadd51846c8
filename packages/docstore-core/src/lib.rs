//! Embedded document store with declarative schemas and typed
//! collection facades.
//!
//! A [`Connection`] owns an in-process database addressed by a
//! `docstore://` URI. Raw documents live in named [`Collection`]s;
//! typed access goes through a [`Repository`] bound to a [`Model`]
//! implementation, which validates whole records against their
//! [`Schema`] before every insert or save and reports all violated
//! fields at once.

pub mod collection;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod filter;
pub mod model;
pub mod patch;
mod persistence;
pub mod repository;
pub mod schema;

pub use collection::Collection;
pub use config::{ConnectOptions, DEFAULT_PORT};
pub use connection::Connection;
pub use document::{document_id, Document, DocumentId, ID_FIELD};
pub use error::{DbError, Result, ValidationError, Violation};
pub use filter::Filter;
pub use model::Model;
pub use patch::Patch;
pub use repository::Repository;
pub use schema::{FieldSpec, FieldType, Schema};

//! Typed records for the company database, stored through
//! `docstore-core` repositories.

pub mod employee;

pub use employee::Employee;

//! hrms - employee records over HTTP, stored in MongoDB
//!
//! Four operations on a single `employees` collection:
//! - list every employee
//! - create one (the store assigns the id)
//! - replace name, salary and age by id
//! - delete by id

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};

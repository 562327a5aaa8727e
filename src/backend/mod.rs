//! Backend command dispatch
//!
//! The backend itself (IPC to the application core) is injected through the
//! [`Backend`] trait.

pub mod query;

pub use query::{Backend, BackendQuery, InvokeError, QueryError, QueryOptions};

//! Stack view-model helpers
//!
//! Stacks arrive from the backend as plain data; this module derives names,
//! push and conflict state, display hints, and user notices from them.

pub mod notices;
pub mod status;
pub mod types;

pub use notices::{
    handle_create_branch_from_branch_outcome, handle_move_branch_result, pretty_named_list,
    Notice, Notifier,
};
pub use status::*;
pub use types::*;

//! One module per command group.

pub mod admin;
pub mod contact;
pub mod content;
pub mod inbox;
pub mod remote;

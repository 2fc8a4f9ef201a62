//! Command implementations

pub mod completions;
pub mod hardware;
pub mod init;
pub mod price;
pub mod quote;
pub mod rules;
pub mod validate;
pub mod webbing;

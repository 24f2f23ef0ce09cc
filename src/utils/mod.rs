//! Address and argument helpers

pub mod helper;
pub mod ss58;

pub use helper::{format_account, parse_requested_height};

//! Collection of small, reusable helpers used by the stores and handlers.

pub mod email;
pub mod handlers_common;
pub mod password;
pub mod token_key;

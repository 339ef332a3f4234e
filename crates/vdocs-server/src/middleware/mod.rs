//! HTTP middleware.

pub(crate) mod security;
pub(crate) mod trailing_slash;

//! CLI command implementations.

pub(crate) mod combine;
pub(crate) mod inspect;
pub(crate) mod unpack;

//! Credential and token types.

mod certificate;
mod common;
mod token;

pub use certificate::*;
pub use common::*;
pub use token::*;

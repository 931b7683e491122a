//! Service endpoint modules.

mod certificate;
mod data;
mod token;
mod trustroots;

pub use certificate::CertificateApi;
pub use data::{file_name_from_url, DataApi};
pub use token::TokenApi;
pub use trustroots::{parse_trust_roots, TrustRootsApi};

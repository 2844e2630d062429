//! Helpers shared by the discovery pipeline and the command-line front end.
//!
//! - **URL validation**: scheme checks and the private-host (SSRF) guard applied
//!   before every request
//! - **Text**: sanitizing untrusted strings before they reach the terminal

mod text;
mod url_validator;

pub use text::printable_line;
pub use url_validator::{validate_url, UrlValidationError};

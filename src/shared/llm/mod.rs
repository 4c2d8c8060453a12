//! Tolerant parsing of JSON produced by language/vision models.

mod parser;
mod response;

pub use parser::parse_with_fallback;
pub use response::LlmResponse;

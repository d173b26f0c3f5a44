use thiserror::Error;

mod domain_types;
mod ids;
mod properties;

pub use domain_types::*;
pub use ids::*;
pub use properties::*;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid Notion token format: {reason}")]
    InvalidNotionToken { reason: String },

    #[error("Invalid Ghost admin key: {reason}")]
    InvalidAdminKey { reason: String },
}

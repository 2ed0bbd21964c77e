use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DogError {
    #[error("unknown breed: {0}")]
    UnknownBreed(String),

    #[error("`{command}` is not allowed while {state}")]
    InvalidTransition {
        command: &'static str,
        state: &'static str,
    },

    #[error("invalid session command: {0}")]
    InvalidCommand(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("breed list request failed: {0}")]
    TaxonomyHttp(String),

    #[error("breed list returned status {status}: {message}")]
    TaxonomyStatus { status: u16, message: String },

    #[error("malformed breed list: {0}")]
    MalformedTaxonomy(String),

    #[error("image request failed: {0}")]
    ImageHttp(String),

    #[error("image request returned status {status}: {message}")]
    ImageStatus { status: u16, message: String },

    #[error("malformed image response: {0}")]
    MalformedImage(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

//! Error types emitted by the Shillscope CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use shillscope_core::{RatingScaleError, RatingTableError};
use shillscope_features::ExtractionError;
use thiserror::Error;

/// Errors emitted by the Shillscope CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it on the command line or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configured rating scale is empty.
    #[error("invalid rating scale: {0}")]
    InvalidRatingScale(#[from] RatingScaleError),
    /// An input document could not be opened.
    #[error("failed to open {path:?}: {source}")]
    OpenInput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An input document is not the expected JSON.
    #[error("failed to parse JSON at {path:?}: {source}")]
    ParseInput {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The ratings document holds a rating outside the scale.
    #[error("ratings in {path:?} failed validation: {source}")]
    InvalidRatings {
        path: Utf8PathBuf,
        #[source]
        source: RatingTableError,
    },
    /// The extraction pipeline rejected its options.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Serialising the feature table failed.
    #[error("failed to serialise feature table: {0}")]
    SerialiseFeatures(#[source] serde_json::Error),
    /// The output file could not be created.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the feature table failed.
    #[error("failed to write feature table: {0}")]
    WriteOutput(#[source] std::io::Error),
}

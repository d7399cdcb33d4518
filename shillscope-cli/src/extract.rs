//! Extract command implementation for the Shillscope CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use shillscope_core::{
    DEFAULT_RATING_MAX, FeatureTable, InauthenticUsers, RatingEvent, RatingScale, RatingTable,
};
use shillscope_features::{ExtractionOptions, FeatureExtractionPipeline, Parallelism};
use shillscope_fs::{create_file, is_file, open_file};

use crate::{
    ARG_INAUTHENTIC_USERS, ARG_OUTPUT, ARG_RATING_SCALE, ARG_RATINGS, ARG_THREADS, CliError,
    ENV_RATINGS,
};

/// CLI arguments for the `extract` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute behavioural descriptors for every user in a JSON \
                 ratings document and label each row from an optional list \
                 of known inauthentic users. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Extract labelled per-user features from ratings"
)]
#[ortho_config(prefix = "SHILLSCOPE")]
pub(crate) struct ExtractArgs {
    /// Path to a JSON array of `{user_id, item_id, rating}` events.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) ratings: Option<Utf8PathBuf>,
    /// Path to a JSON array of user ids to label inauthentic.
    #[arg(long = ARG_INAUTHENTIC_USERS, value_name = "path")]
    #[serde(default)]
    pub(crate) inauthentic_users: Option<Utf8PathBuf>,
    /// Write the feature table here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Highest rating on the scale (ratings run from 1).
    #[arg(long = ARG_RATING_SCALE, value_name = "max")]
    #[serde(default)]
    pub(crate) rating_scale: Option<u8>,
    /// Extract users on this many worker threads.
    #[arg(long = ARG_THREADS, value_name = "count")]
    #[serde(default)]
    pub(crate) threads: Option<usize>,
}

impl ExtractArgs {
    pub(crate) fn into_config(self) -> Result<ExtractConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExtractConfig::try_from(merged)
    }
}

/// Resolved `extract` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractConfig {
    /// Ratings document.
    pub(crate) ratings: Utf8PathBuf,
    /// Optional list of inauthentic users; everyone is authentic without it.
    pub(crate) inauthentic_users: Option<Utf8PathBuf>,
    /// Output file; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Pipeline options.
    pub(crate) options: ExtractionOptions,
}

impl ExtractConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.ratings, ARG_RATINGS)?;
        if let Some(path) = &self.inauthentic_users {
            Self::require_existing(path, ARG_INAUTHENTIC_USERS)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<ExtractArgs> for ExtractConfig {
    type Error = CliError;

    fn try_from(args: ExtractArgs) -> Result<Self, Self::Error> {
        let ratings = args.ratings.ok_or(CliError::MissingArgument {
            field: ARG_RATINGS,
            env: ENV_RATINGS,
        })?;
        let scale = RatingScale::new(args.rating_scale.unwrap_or(DEFAULT_RATING_MAX))?;
        let parallelism = args
            .threads
            .map_or(Parallelism::Sequential, Parallelism::Threads);
        Ok(Self {
            ratings,
            inauthentic_users: args.inauthentic_users,
            output: args.output,
            options: ExtractionOptions::default()
                .with_scale(scale)
                .with_parallelism(parallelism),
        })
    }
}

pub(crate) fn run_extract(args: ExtractArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_extract_with(args, &mut stdout)
}

pub(crate) fn run_extract_with(args: ExtractArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_extract_config(args)?;
    let features = execute_extract(&config)?;
    match &config.output {
        Some(path) => {
            let mut file = create_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            write_feature_table(&mut file, &features)?;
            debug!("wrote {} feature rows to {path}", features.len());
            Ok(())
        }
        None => write_feature_table(writer, &features),
    }
}

fn resolve_extract_config(args: ExtractArgs) -> Result<ExtractConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_extract(config: &ExtractConfig) -> Result<FeatureTable, CliError> {
    let pipeline = FeatureExtractionPipeline::new(config.options)?;
    let ratings = load_ratings(&config.ratings, config.options.scale)?;
    let labels = match &config.inauthentic_users {
        Some(path) => load_inauthentic_users(path)?,
        None => InauthenticUsers::default(),
    };
    Ok(pipeline.run(&ratings, &labels))
}

/// Loads and validates a JSON ratings document.
pub(crate) fn load_ratings(path: &Utf8Path, scale: RatingScale) -> Result<RatingTable, CliError> {
    let events: Vec<RatingEvent> = load_json(path)?;
    RatingTable::validated(events, scale).map_err(|source| CliError::InvalidRatings {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a JSON array of inauthentic user ids.
pub(crate) fn load_inauthentic_users(path: &Utf8Path) -> Result<InauthenticUsers, CliError> {
    let ids: Vec<u64> = load_json(path)?;
    Ok(ids.into_iter().collect())
}

fn load_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CliError> {
    let file = open_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}

fn write_feature_table(writer: &mut dyn Write, features: &FeatureTable) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(features).map_err(CliError::SerialiseFeatures)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ExtractConfig, CliError> {
    let merged = ExtractArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ExtractConfig::try_from(merged)
}

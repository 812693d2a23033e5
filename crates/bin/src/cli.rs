//! CLI argument definitions for the docmodel binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docmodel::{FieldPath, model::PathError};

use crate::output::OutputFormat;

/// Inspect and edit JSON documents as field trees
#[derive(Parser, Debug)]
#[command(name = "docmodel")]
#[command(about = "docmodel: path-addressable document trees with field-mask merges")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        global = true,
        default_value = "human",
        env = "DOCMODEL_FORMAT"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the field mask of a document
    Mask(MaskArgs),
    /// Print the value at a path
    Get(GetArgs),
    /// Set a value at a path and print the document
    Set(SetArgs),
    /// Delete the field at a path and print the document
    Delete(DeleteArgs),
    /// Merge fields from a source document into a target document
    Merge(MergeArgs),
}

/// Parses a field path in canonical dotted form, e.g. ``user.`first.name` ``
fn parse_field_path(input: &str) -> Result<FieldPath, PathError> {
    FieldPath::from_server_format(input)
}

/// Arguments for the mask command
#[derive(clap::Args, Debug)]
pub struct MaskArgs {
    /// JSON document file, or `-` for stdin
    pub document: PathBuf,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// JSON document file, or `-` for stdin
    pub document: PathBuf,

    /// Field path to read
    #[arg(value_parser = parse_field_path)]
    pub path: FieldPath,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// JSON document file, or `-` for stdin
    pub document: PathBuf,

    /// Field path to write
    #[arg(value_parser = parse_field_path)]
    pub path: FieldPath,

    /// JSON value to store
    pub value: String,
}

/// Arguments for the delete command
#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// JSON document file, or `-` for stdin
    pub document: PathBuf,

    /// Field path to delete
    #[arg(value_parser = parse_field_path)]
    pub path: FieldPath,
}

/// Arguments for the merge command
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// JSON document to merge into
    pub target: PathBuf,

    /// JSON document providing the values
    pub source: PathBuf,

    /// Fields to merge; defaults to every field of the source.
    /// Masked fields missing from the source are deleted from the target.
    #[arg(short, long = "mask", value_parser = parse_field_path, num_args = 1..)]
    pub mask: Vec<FieldPath>,
}

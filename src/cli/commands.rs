// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands: `annotate` and `entities`.
//
// The recognizer flags are shared: `--lexicon` wins when given,
// otherwise the model directory (with its default) is used.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::annotate_use_case::PipelineConfig;
use crate::domain::mention::Category;
use crate::ml::RecognizerSource;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a table of abstracts or a PDF paper and export the results
    Annotate(AnnotateArgs),

    /// Print the ranked entity counts of one category
    Entities(EntitiesArgs),
}

/// Where the recognizer comes from
#[derive(Args, Debug, Clone)]
pub struct RecognizerArgs {
    /// Directory with ner_config.json, tokenizer.json and model.mpk.gz
    #[arg(long, default_value = "models/en_pipeline")]
    pub model_dir: PathBuf,

    /// JSON term lists to use instead of the neural model
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
}

impl From<RecognizerArgs> for RecognizerSource {
    fn from(a: RecognizerArgs) -> Self {
        match a.lexicon {
            Some(path) => RecognizerSource::Lexicon(path),
            None       => RecognizerSource::Model(a.model_dir),
        }
    }
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Input file: .csv, .xlsx, .xls (needs an "Abstract" column) or .pdf
    #[arg(long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,

    /// Directory for the CSV exports
    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    /// Skip writing CSV exports
    #[arg(long)]
    pub no_export: bool,

    /// Results page to print (1-based, clamped to the last page)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Records per page
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: u64,

    /// Entities shown per category in the rankings
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// The application layer never sees clap types
impl From<AnnotateArgs> for PipelineConfig {
    fn from(a: AnnotateArgs) -> Self {
        PipelineConfig {
            input:      a.input,
            output_dir: (!a.no_export).then_some(a.output_dir),
            recognizer: a.recognizer.into(),
            page_size:  a.page_size as usize,
            top_n:      a.top,
        }
    }
}

#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Input file: .csv, .xlsx, .xls or .pdf
    #[arg(long)]
    pub input: PathBuf,

    /// Entity category to list
    #[arg(long, value_enum)]
    pub category: CategoryArg,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

impl From<EntitiesArgs> for PipelineConfig {
    fn from(a: EntitiesArgs) -> Self {
        PipelineConfig {
            input:      a.input,
            output_dir: None,
            recognizer: a.recognizer.into(),
            ..PipelineConfig::default()
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Seaweed,
    Location,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Seaweed  => Category::Seaweed,
            CategoryArg::Location => Category::Location,
        }
    }
}

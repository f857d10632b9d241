use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use schemagen_core::RunMode;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate per-language READMEs and visitor bindings from one YAML source of truth.",
	long_about = "schemagen renders derived artifacts from a single YAML document through \
	              templates: a README per language binding from the README config, and visitor \
	              callback code per target language from the callback schema.\n\nQuick start:\n  \
	              schemagen readme               Regenerate every README\n  schemagen readme \
	              --validate    Fail when a committed README is stale\n  schemagen visitors \
	              --dry-run  Preview the generated visitor bindings"
)]
pub struct SchemagenCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate the README of every language binding.
	///
	/// Reads the README config (`scripts/readme_config.yaml` by default),
	/// renders each language's template and writes it to the language's
	/// package directory. Snippets and migration guides are pulled from
	/// `docs/`.
	Readme {
		/// Only process this language.
		#[arg(long, short)]
		language: Option<String>,

		#[command(flatten)]
		run: RunArgs,
	},
	/// Generate the visitor-callback bindings of every target language.
	///
	/// Reads the callback schema and renders one source file per entry in
	/// `generation.targets`.
	Visitors {
		/// Only process this target language.
		#[arg(long, short)]
		language: Option<String>,

		#[command(flatten)]
		run: RunArgs,
	},
}

/// Flags shared by every generating command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
	/// Render everything but write nothing. Prints what would be written.
	#[arg(long, default_value_t = false, conflicts_with = "validate")]
	pub dry_run: bool,

	/// Compare the committed output with what would be generated. Exits
	/// with a non-zero status code when anything is missing or stale.
	///
	/// Ideal for CI pipelines.
	#[arg(long, default_value_t = false)]
	pub validate: bool,

	/// Show a unified diff for each stale output.
	#[arg(long, default_value_t = false)]
	pub diff: bool,

	/// Output format for the run summary. Use `text` for human-readable
	/// output or `json` for programmatic consumption.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,
}

impl RunArgs {
	pub fn mode(&self) -> RunMode {
		if self.validate {
			RunMode::Validate
		} else if self.dry_run {
			RunMode::DryRun
		} else {
			RunMode::Generate
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each outcome includes the
	/// target name, output path and status.
	Json,
}

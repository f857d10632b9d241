use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum GenError {
	#[error(transparent)]
	#[diagnostic(code(schemagen::io_error))]
	Io(#[from] std::io::Error),

	#[error("configuration file not found: `{path}`")]
	#[diagnostic(
		code(schemagen::config_not_found),
		help("create the file or point `schemagen.toml` at the right location")
	)]
	ConfigNotFound { path: String },

	#[error("failed to parse configuration `{path}`: {reason}")]
	#[diagnostic(code(schemagen::config_parse))]
	ConfigParse { path: String, reason: String },

	#[error("configuration file is empty: `{path}`")]
	#[diagnostic(code(schemagen::config_empty))]
	ConfigEmpty { path: String },

	#[error("missing required key `{key}` in `{path}`")]
	#[diagnostic(
		code(schemagen::missing_key),
		help("add a top-level `{key}` section to the document")
	)]
	MissingKey { key: String, path: String },

	#[error("unknown target `{name}`")]
	#[diagnostic(code(schemagen::unknown_target), help("available targets: {available}"))]
	UnknownTarget { name: String, available: String },

	#[error("template directory not found: `{path}`")]
	#[diagnostic(code(schemagen::template_dir_not_found))]
	TemplateDirNotFound { path: String },

	#[error("template not found: `{name}` (expected at `{expected}`)")]
	#[diagnostic(code(schemagen::template_not_found))]
	TemplateNotFound { name: String, expected: String },

	#[error("failed to render template `{template}`: {reason}")]
	#[diagnostic(code(schemagen::template_render))]
	TemplateRender { template: String, reason: String },

	#[error("snippet not found: tried {attempted} (looking for `{lookup}`)")]
	#[diagnostic(
		code(schemagen::snippet_not_found),
		help("snippets live under docs/snippets/<language>/")
	)]
	SnippetNotFound { attempted: String, lookup: String },

	#[error("no code block found in markdown snippet: `{path}`")]
	#[diagnostic(
		code(schemagen::missing_code_block),
		help("wrap the snippet code in triple backticks; only the first fenced block is used")
	)]
	MissingCodeBlock { path: String },

	#[error("failed to load markdown: {0}")]
	#[diagnostic(code(schemagen::markdown))]
	Markdown(String),

	#[error("benchmark #{index} does not match the `{expected}` shape of the first record")]
	#[diagnostic(
		code(schemagen::mixed_benchmarks),
		help("every record in one benchmark list must use either `latency` or `ops_sec`")
	)]
	MixedBenchmarkShapes { index: usize, expected: String },

	#[error("benchmark #{index} is missing field `{field}`")]
	#[diagnostic(code(schemagen::invalid_benchmark))]
	InvalidBenchmark { index: usize, field: String },
}

pub type GenResult<T> = Result<T, GenError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::GenError;
use crate::GenResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"schemagen.toml",
	".schemagen.toml",
	".config/schemagen.toml",
];

/// Project layout loaded from an optional `schemagen.toml` file.
///
/// Every path is relative to the project root and has a default, so the file
/// only needs the entries that differ:
///
/// ```toml
/// [readme]
/// config = "scripts/readme_config.yaml"
/// templates = "scripts/readme_templates"
/// docs = "docs"
/// packages = "packages"
///
/// [visitors]
/// schema = "crates/html-to-markdown-ffi/visitor_callbacks.yaml"
/// templates = "crates/html-to-markdown-ffi/templates"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemagenConfig {
	#[serde(default)]
	pub readme: ReadmeLayout,
	#[serde(default)]
	pub visitors: VisitorLayout,
}

/// Where the README generator finds its inputs and writes its outputs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeLayout {
	/// The YAML README config.
	#[serde(default = "default_readme_config")]
	pub config: PathBuf,
	/// Directory holding the `*.md.jinja` templates.
	#[serde(default = "default_readme_templates")]
	pub templates: PathBuf,
	/// Docs root containing `snippets/` and `migration-guides/`.
	#[serde(default = "default_docs")]
	pub docs: PathBuf,
	/// Root of the per-language packages receiving `README.md` files.
	#[serde(default = "default_packages")]
	pub packages: PathBuf,
}

impl Default for ReadmeLayout {
	fn default() -> Self {
		Self {
			config: default_readme_config(),
			templates: default_readme_templates(),
			docs: default_docs(),
			packages: default_packages(),
		}
	}
}

/// Where the visitor-callback generator finds its schema and templates.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorLayout {
	#[serde(default = "default_visitor_schema")]
	pub schema: PathBuf,
	#[serde(default = "default_visitor_templates")]
	pub templates: PathBuf,
}

impl Default for VisitorLayout {
	fn default() -> Self {
		Self {
			schema: default_visitor_schema(),
			templates: default_visitor_templates(),
		}
	}
}

fn default_readme_config() -> PathBuf {
	PathBuf::from("scripts/readme_config.yaml")
}

fn default_readme_templates() -> PathBuf {
	PathBuf::from("scripts/readme_templates")
}

fn default_docs() -> PathBuf {
	PathBuf::from("docs")
}

fn default_packages() -> PathBuf {
	PathBuf::from("packages")
}

fn default_visitor_schema() -> PathBuf {
	PathBuf::from("crates/html-to-markdown-ffi/visitor_callbacks.yaml")
}

fn default_visitor_templates() -> PathBuf {
	PathBuf::from("crates/html-to-markdown-ffi/templates")
}

impl SchemagenConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Falls back to the default layout when no file exists.
	pub fn load(root: &Path) -> GenResult<SchemagenConfig> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(SchemagenConfig::default());
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: SchemagenConfig = toml::from_str(&content).map_err(|e| {
			GenError::ConfigParse {
				path: config_path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		tracing::debug!(path = %config_path.display(), "loaded project config");
		Ok(config)
	}
}

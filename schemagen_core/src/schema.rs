//! Loading of the YAML documents that drive generation.
//!
//! Both documents are parsed into [`serde_json::Value`] first so required
//! top-level keys can be reported by name, then deserialized into typed
//! structures. Loading is all-or-nothing: any failure returns an error and no
//! partial document.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::GenError;
use crate::GenResult;

/// Top-level keys every visitor-callback schema must define.
pub const CALLBACK_SCHEMA_KEYS: [&str; 5] =
	["version", "metadata", "types", "callbacks", "generation"];

/// Top-level keys every README config must define.
pub const README_CONFIG_KEYS: [&str; 1] = ["languages"];

/// The visitor-callback schema.
///
/// ```yaml
/// version: "1.0.0"
/// metadata:
///   total_callbacks: 2
///   expected_reduction:
///     go: "Go: ~600 lines removed"
/// types:
///   NodeContext: { fields: [] }
/// callbacks:
///   - name: visit_text
/// generation:
///   targets:
///     go:
///       template: templates/go.j2
///       output_file: packages/go/visitor_generated.go
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackSchema {
	#[serde(deserialize_with = "scalar_string")]
	pub version: String,
	pub metadata: SchemaMetadata,
	pub types: Map<String, Value>,
	pub callbacks: Vec<Value>,
	pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaMetadata {
	/// Human readable callback count, printed in the run summary.
	#[serde(default)]
	pub total_callbacks: Value,
	/// Notes about the code each target replaces.
	#[serde(default)]
	pub expected_reduction: Map<String, Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SchemaMetadata {
	/// The metadata mapping as written, for template contexts.
	pub fn to_value(&self) -> Value {
		let mut map = self.extra.clone();
		map.insert("total_callbacks".into(), self.total_callbacks.clone());
		map.insert(
			"expected_reduction".into(),
			Value::Object(self.expected_reduction.clone()),
		);
		Value::Object(map)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
	pub targets: Map<String, Value>,
}

/// One `generation.targets` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
	pub template: String,
	pub output_file: PathBuf,
}

impl CallbackSchema {
	pub fn load(path: &Path) -> GenResult<Self> {
		load_document(path, &CALLBACK_SCHEMA_KEYS)
	}

	pub fn from_yaml(content: &str, path: &Path) -> GenResult<Self> {
		parse_document(content, path, &CALLBACK_SCHEMA_KEYS)
	}

	/// The configured targets in document order.
	pub fn targets(&self, path: &Path) -> GenResult<Vec<(String, TargetConfig)>> {
		self.generation
			.targets
			.iter()
			.map(|(name, value)| {
				let config = TargetConfig::deserialize(value).map_err(|e| {
					GenError::ConfigParse {
						path: path.display().to_string(),
						reason: format!("generation.targets.{name}: {e}"),
					}
				})?;
				Ok((name.clone(), config))
			})
			.collect()
	}

	/// The total callback count as written in the schema, or the number of
	/// callbacks when the schema leaves it out.
	pub fn total_callbacks(&self) -> String {
		match &self.metadata.total_callbacks {
			Value::Null => self.callbacks.len().to_string(),
			Value::String(s) => s.clone(),
			other => other.to_string(),
		}
	}

	/// `expected_reduction` notes as display strings.
	pub fn expected_reductions(&self) -> Vec<String> {
		self.metadata
			.expected_reduction
			.values()
			.map(|value| {
				match value {
					Value::String(s) => s.clone(),
					other => other.to_string(),
				}
			})
			.collect()
	}
}

/// The README generation config.
///
/// ```yaml
/// version: "2.0.0"
/// license: MIT
/// discord_url: https://discord.gg/example
/// banner_url: https://example.com/banner.png
/// languages:
///   python:
///     template: python.md.jinja
///     package_name: html-to-markdown
///   go:
///     output_path: packages/go/v2/README.md
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeConfig {
	#[serde(default, deserialize_with = "scalar_string")]
	pub version: String,
	#[serde(default = "default_license")]
	pub license: String,
	#[serde(default)]
	pub discord_url: String,
	#[serde(default)]
	pub banner_url: String,
	pub languages: Map<String, Value>,
}

/// Per-language README settings. Fields other than `template` and
/// `output_path` are passed to the template verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConfig {
	#[serde(default)]
	pub template: Option<String>,
	#[serde(default)]
	pub output_path: Option<PathBuf>,
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl LanguageConfig {
	/// Template name, defaulting to `{code}.md.jinja`.
	pub fn template_name(&self, code: &str) -> String {
		self.template
			.clone()
			.unwrap_or_else(|| format!("{code}.md.jinja"))
	}
}

fn default_license() -> String {
	"MIT".to_string()
}

impl ReadmeConfig {
	pub fn load(path: &Path) -> GenResult<Self> {
		load_document(path, &README_CONFIG_KEYS)
	}

	pub fn from_yaml(content: &str, path: &Path) -> GenResult<Self> {
		parse_document(content, path, &README_CONFIG_KEYS)
	}

	/// Language entries in document order.
	pub fn languages(&self, path: &Path) -> GenResult<Vec<(String, LanguageConfig)>> {
		self.languages
			.iter()
			.map(|(code, value)| {
				let config = if value.is_null() {
					LanguageConfig::default()
				} else {
					LanguageConfig::deserialize(value).map_err(|e| {
						GenError::ConfigParse {
							path: path.display().to_string(),
							reason: format!("languages.{code}: {e}"),
						}
					})?
				};
				Ok((code.clone(), config))
			})
			.collect()
	}
}

fn load_document<T: DeserializeOwned>(path: &Path, required: &[&str]) -> GenResult<T> {
	if !path.is_file() {
		return Err(GenError::ConfigNotFound {
			path: path.display().to_string(),
		});
	}

	let content = std::fs::read_to_string(path)?;
	parse_document(&content, path, required)
}

fn parse_document<T: DeserializeOwned>(
	content: &str,
	path: &Path,
	required: &[&str],
) -> GenResult<T> {
	let display = path.display().to_string();
	if is_blank_document(content) {
		return Err(GenError::ConfigEmpty { path: display });
	}

	let value: Value = serde_yaml_ng::from_str(content).map_err(|e| {
		GenError::ConfigParse {
			path: display.clone(),
			reason: e.to_string(),
		}
	})?;

	let document = match value {
		Value::Null => return Err(GenError::ConfigEmpty { path: display }),
		Value::Object(map) if map.is_empty() => {
			return Err(GenError::ConfigEmpty { path: display });
		}
		Value::Object(map) => map,
		_ => {
			return Err(GenError::ConfigParse {
				path: display,
				reason: "expected a mapping at the top level".to_string(),
			});
		}
	};

	if let Some(key) = required.iter().find(|key| !document.contains_key(**key)) {
		return Err(GenError::MissingKey {
			key: (*key).to_string(),
			path: display,
		});
	}

	serde_json::from_value(Value::Object(document)).map_err(|e| {
		GenError::ConfigParse {
			path: display,
			reason: e.to_string(),
		}
	})
}

/// Only whitespace and comments.
fn is_blank_document(content: &str) -> bool {
	content
		.lines()
		.map(str::trim)
		.all(|line| line.is_empty() || line.starts_with('#'))
}

/// Accept strings, numbers and booleans for fields such as `version`, which
/// YAML happily parses as a float.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::String(s) => Ok(s),
		Value::Null => Ok(String::new()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(b) => Ok(b.to_string()),
		other => {
			Err(serde::de::Error::custom(format!(
				"expected a scalar, found `{other}`"
			)))
		}
	}
}

use std::path::Path;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use crate::GenResult;
use crate::config::ReadmeLayout;
use crate::docs::DocsDir;
use crate::filters::FilterSet;
use crate::generator::Target;
use crate::generator::TargetPlan;
use crate::schema::LanguageConfig;
use crate::schema::ReadmeConfig;
use crate::template::TemplateRenderer;
use crate::template::TemplateStyle;

/// Language whose package keeps its README in a nested `v2/` module
/// directory.
pub const NESTED_V2_LANGUAGE: &str = "go";

/// Per-language README targets built from a [`ReadmeConfig`].
#[derive(Debug, Clone)]
pub struct ReadmePlan {
	config: ReadmeConfig,
	languages: Vec<(String, LanguageConfig)>,
	targets: Vec<Target>,
	docs: DocsDir,
}

impl ReadmePlan {
	/// Build the plan from an already loaded config. `config_path` is only
	/// used in error messages.
	pub fn new(
		config: ReadmeConfig,
		config_path: &Path,
		root: &Path,
		layout: &ReadmeLayout,
	) -> GenResult<Self> {
		let languages = config.languages(config_path)?;
		let packages = root.join(&layout.packages);
		let targets = languages
			.iter()
			.map(|(code, language)| {
				Target {
					name: code.clone(),
					template: language.template_name(code),
					output: resolve_output_path(root, &packages, code, language),
				}
			})
			.collect();

		Ok(Self {
			config,
			languages,
			targets,
			docs: DocsDir::new(root.join(&layout.docs)),
		})
	}

	/// Load the README config named by `layout` and build the plan.
	pub fn load(root: &Path, layout: &ReadmeLayout) -> GenResult<Self> {
		let config_path = root.join(&layout.config);
		let config = ReadmeConfig::load(&config_path)?;
		tracing::info!(
			languages = config.languages.len(),
			"loaded README configuration"
		);
		Self::new(config, &config_path, root, layout)
	}

	pub fn config(&self) -> &ReadmeConfig {
		&self.config
	}

	pub fn docs(&self) -> &DocsDir {
		&self.docs
	}

	/// A renderer for the README templates with the docs filters installed.
	pub fn renderer(&self, templates: impl Into<PathBuf>) -> GenResult<TemplateRenderer> {
		let filters = FilterSet::with_docs(self.docs.clone());
		TemplateRenderer::new(templates, TemplateStyle::Markdown, &filters)
	}

	fn language(&self, code: &str) -> Option<&LanguageConfig> {
		self.languages
			.iter()
			.find(|(name, _)| name == code)
			.map(|(_, language)| language)
	}
}

impl TargetPlan for ReadmePlan {
	fn targets(&self) -> &[Target] {
		&self.targets
	}

	/// Shared fields first, then the language's own fields, which win on
	/// conflict.
	fn context(&self, target: &Target) -> Value {
		let code = target.name.as_str();
		let version = self.config.version.as_str();
		let mut context = Map::new();
		context.insert("language".into(), code.into());
		context.insert("version".into(), version.into());
		context.insert("license".into(), self.config.license.as_str().into());
		context.insert(
			"discord_url".into(),
			self.config.discord_url.as_str().into(),
		);
		context.insert("banner_url".into(), self.config.banner_url.as_str().into());
		context.insert(
			"migration_guide".into(),
			self.docs.migration_guide(code, version).into(),
		);

		if let Some(language) = self.language(code) {
			if let Some(template) = &language.template {
				context.insert("template".into(), template.as_str().into());
			}
			if let Some(output_path) = &language.output_path {
				context.insert(
					"output_path".into(),
					output_path.display().to_string().into(),
				);
			}
			for (key, value) in &language.fields {
				context.insert(key.clone(), value.clone());
			}
		}

		Value::Object(context)
	}
}

/// Where a language's README goes: an explicit `output_path` relative to the
/// project root, the nested `v2/` module for Go, or
/// `{packages}/{code}/README.md`.
pub fn resolve_output_path(
	root: &Path,
	packages: &Path,
	code: &str,
	language: &LanguageConfig,
) -> PathBuf {
	if let Some(output_path) = &language.output_path {
		return root.join(output_path);
	}

	if code == NESTED_V2_LANGUAGE {
		return packages.join(code).join("v2").join("README.md");
	}

	packages.join(code).join("README.md")
}

use std::path::Path;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use crate::GenResult;
use crate::config::VisitorLayout;
use crate::filters::FilterSet;
use crate::generator::Target;
use crate::generator::TargetPlan;
use crate::schema::CallbackSchema;
use crate::template::TemplateRenderer;
use crate::template::TemplateStyle;

/// Visitor-callback bindings, one target per language in
/// `generation.targets`.
#[derive(Debug, Clone)]
pub struct VisitorPlan {
	schema: CallbackSchema,
	targets: Vec<Target>,
}

impl VisitorPlan {
	pub fn new(schema: CallbackSchema, schema_path: &Path, root: &Path) -> GenResult<Self> {
		let targets = schema
			.targets(schema_path)?
			.into_iter()
			.map(|(name, config)| {
				Target {
					name,
					template: template_file_name(&config.template),
					output: root.join(&config.output_file),
				}
			})
			.collect();

		Ok(Self { schema, targets })
	}

	pub fn load(root: &Path, layout: &VisitorLayout) -> GenResult<Self> {
		let schema_path = root.join(&layout.schema);
		let schema = CallbackSchema::load(&schema_path)?;
		tracing::info!(
			version = %schema.version,
			callbacks = schema.callbacks.len(),
			"loaded visitor callback schema"
		);
		Self::new(schema, &schema_path, root)
	}

	pub fn schema(&self) -> &CallbackSchema {
		&self.schema
	}

	/// A renderer for code templates with the text filters installed.
	pub fn renderer(&self, templates: impl Into<PathBuf>) -> GenResult<TemplateRenderer> {
		TemplateRenderer::new(templates, TemplateStyle::Code, &FilterSet::new())
	}
}

impl TargetPlan for VisitorPlan {
	fn targets(&self) -> &[Target] {
		&self.targets
	}

	fn context(&self, target: &Target) -> Value {
		let mut context = Map::new();
		context.insert("target".into(), target.name.as_str().into());
		context.insert("version".into(), self.schema.version.as_str().into());
		context.insert("metadata".into(), self.schema.metadata.to_value());
		context.insert("types".into(), Value::Object(self.schema.types.clone()));
		context.insert("callbacks".into(), Value::Array(self.schema.callbacks.clone()));
		Value::Object(context)
	}
}

/// Templates are looked up by file name only; directories in the schema's
/// `template` entry are informational.
fn template_file_name(template: &str) -> String {
	Path::new(template)
		.file_name()
		.map_or_else(|| template.to_string(), |name| name.to_string_lossy().into_owned())
}

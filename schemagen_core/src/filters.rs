use heck::ToKebabCase;
use heck::ToLowerCamelCase;
use heck::ToShoutySnakeCase;
use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use minijinja::Environment;
use minijinja::Error;
use minijinja::ErrorKind;
use minijinja::Value;

use crate::GenError;
use crate::code_block::wrap_with_language;
use crate::docs::DocsDir;
use crate::performance::render_performance_table;

pub const INCLUDE_SNIPPET: &str = "include_snippet";
pub const HAS_MIGRATION: &str = "has_migration";
pub const MIGRATION_GUIDE: &str = "migration_guide";
pub const RENDER_PERFORMANCE_TABLE: &str = "render_performance_table";
pub const FENCE: &str = "fence";
pub const SNAKE_CASE: &str = "snake_case";
pub const PASCAL_CASE: &str = "pascal_case";
pub const CAMEL_CASE: &str = "camel_case";
pub const SHOUTY_SNAKE_CASE: &str = "shouty_snake_case";
pub const KEBAB_CASE: &str = "kebab_case";

/// The filters made available to templates.
///
/// Built once when a generator starts and installed into its template
/// environment. Text filters are always present; the snippet and
/// migration-guide filters only exist when a docs tree is attached.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
	docs: Option<DocsDir>,
}

impl FilterSet {
	/// Text-only filters, for code templates.
	pub fn new() -> Self {
		Self::default()
	}

	/// Text filters plus the snippet and migration-guide lookups rooted at
	/// `docs`.
	pub fn with_docs(docs: DocsDir) -> Self {
		Self { docs: Some(docs) }
	}

	pub fn docs(&self) -> Option<&DocsDir> {
		self.docs.as_ref()
	}

	/// Names of every filter this set installs, in registration order.
	pub fn names(&self) -> Vec<&'static str> {
		let mut names = vec![
			RENDER_PERFORMANCE_TABLE,
			FENCE,
			SNAKE_CASE,
			PASCAL_CASE,
			CAMEL_CASE,
			SHOUTY_SNAKE_CASE,
			KEBAB_CASE,
		];
		if self.docs.is_some() {
			names.extend([INCLUDE_SNIPPET, HAS_MIGRATION, MIGRATION_GUIDE]);
		}
		names
	}

	/// Register every filter with `env`.
	pub fn install(&self, env: &mut Environment<'static>) {
		env.add_filter(RENDER_PERFORMANCE_TABLE, performance_table);
		env.add_filter(FENCE, fence);
		env.add_filter(SNAKE_CASE, snake_case);
		env.add_filter(PASCAL_CASE, pascal_case);
		env.add_filter(CAMEL_CASE, camel_case);
		env.add_filter(SHOUTY_SNAKE_CASE, shouty_snake_case);
		env.add_filter(KEBAB_CASE, kebab_case);

		let Some(docs) = &self.docs else {
			return;
		};

		let snippets = docs.clone();
		let include = move |path: String, language: String| {
			snippets
				.include_snippet(&path, &language)
				.map_err(filter_error)
		};
		env.add_filter(INCLUDE_SNIPPET, include.clone());
		env.add_function(INCLUDE_SNIPPET, include);

		let guides = docs.clone();
		env.add_filter(HAS_MIGRATION, move |language: String, version: String| {
			guides.has_migration_guide(&language, &version)
		});

		let guides = docs.clone();
		env.add_filter(MIGRATION_GUIDE, move |language: String, version: String| {
			guides.migration_guide(&language, &version)
		});
	}
}

fn performance_table(data: Value, runtime: &str) -> Result<String, Error> {
	let data = serde_json::to_value(&data).map_err(|e| {
		Error::new(
			ErrorKind::InvalidOperation,
			format!("benchmark data is not serializable: {e}"),
		)
	})?;
	render_performance_table(&data, runtime).map_err(filter_error)
}

fn fence(content: &str, language: &str) -> String {
	wrap_with_language(content, language)
}

fn snake_case(value: &str) -> String {
	value.to_snake_case()
}

fn pascal_case(value: &str) -> String {
	value.to_upper_camel_case()
}

fn camel_case(value: &str) -> String {
	value.to_lower_camel_case()
}

fn shouty_snake_case(value: &str) -> String {
	value.to_shouty_snake_case()
}

fn kebab_case(value: &str) -> String {
	value.to_kebab_case()
}

fn filter_error(error: GenError) -> Error {
	Error::new(ErrorKind::InvalidOperation, error.to_string()).with_source(error)
}

use std::path::Path;
use std::path::PathBuf;

use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::ErrorKind;
use minijinja::UndefinedBehavior;
use minijinja::path_loader;
use serde::Serialize;

use crate::GenError;
use crate::GenResult;
use crate::filters::FilterSet;

/// Whitespace handling for a family of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateStyle {
	/// Documentation templates: output whitespace is kept as written.
	Markdown,
	/// Source code templates: block tags strip their own line so control
	/// flow doesn't leave blank lines behind.
	Code,
}

/// Renders named templates from a template directory with a fixed filter set.
#[derive(Debug)]
pub struct TemplateRenderer {
	root: PathBuf,
	env: Environment<'static>,
}

impl TemplateRenderer {
	/// Create a renderer for templates under `root`. The filters are
	/// installed once here and shared by every render.
	pub fn new(
		root: impl Into<PathBuf>,
		style: TemplateStyle,
		filters: &FilterSet,
	) -> GenResult<Self> {
		let root = root.into();
		if !root.is_dir() {
			return Err(GenError::TemplateDirNotFound {
				path: root.display().to_string(),
			});
		}

		let mut env = Environment::new();
		env.set_loader(path_loader(root.clone()));
		env.set_keep_trailing_newline(true);
		env.set_undefined_behavior(UndefinedBehavior::Lenient);
		env.set_auto_escape_callback(|_| AutoEscape::None);
		if style == TemplateStyle::Code {
			env.set_trim_blocks(true);
			env.set_lstrip_blocks(true);
		}
		filters.install(&mut env);

		Ok(Self { root, env })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Full path a template name is expected at.
	pub fn template_path(&self, name: &str) -> PathBuf {
		self.root.join(name)
	}

	/// Render template `name` with `context`.
	pub fn render<S: Serialize>(&self, name: &str, context: S) -> GenResult<String> {
		let template = self.env.get_template(name).map_err(|e| {
			if e.kind() == ErrorKind::TemplateNotFound {
				GenError::TemplateNotFound {
					name: name.to_string(),
					expected: self.template_path(name).display().to_string(),
				}
			} else {
				GenError::TemplateRender {
					template: name.to_string(),
					reason: describe(&e),
				}
			}
		})?;

		template.render(context).map_err(|e| {
			GenError::TemplateRender {
				template: name.to_string(),
				reason: describe(&e),
			}
		})
	}
}

/// Flatten a template error and its causes into one line.
fn describe(error: &minijinja::Error) -> String {
	let mut message = error.to_string();
	let mut source = std::error::Error::source(error);
	while let Some(cause) = source {
		let cause_text = cause.to_string();
		if !message.contains(&cause_text) {
			message.push_str(": ");
			message.push_str(&cause_text);
		}
		source = cause.source();
	}
	message
}

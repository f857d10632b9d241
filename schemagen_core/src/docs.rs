use std::path::Path;
use std::path::PathBuf;

use crate::GenError;
use crate::GenResult;
use crate::code_block::extract_code_block;
use crate::code_block::wrap_code_block;

/// Read-only view of the docs tree used by the snippet and migration-guide
/// filters.
///
/// ```text
/// docs/
///   snippets/{language}/{path}
///   migration-guides/{language}/{version}.md
/// ```
#[derive(Debug, Clone)]
pub struct DocsDir {
	root: PathBuf,
}

impl DocsDir {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn snippets_dir(&self) -> PathBuf {
		self.root.join("snippets")
	}

	pub fn migration_guides_dir(&self) -> PathBuf {
		self.root.join("migration-guides")
	}

	/// Find the snippet file for `path` under `snippets/{language}/`.
	///
	/// A path without an extension is first tried with `.md`. The error names
	/// every candidate that was tried.
	pub fn resolve_snippet(&self, path: &str, language: &str) -> GenResult<PathBuf> {
		let snippet_path = self.snippets_dir().join(language).join(path);
		let mut attempted = Vec::with_capacity(2);

		if snippet_path.extension().is_none() {
			let md_path = snippet_path.with_extension("md");
			if md_path.is_file() {
				return Ok(md_path);
			}
			attempted.push(md_path);
		}

		if snippet_path.is_file() {
			return Ok(snippet_path);
		}
		attempted.push(snippet_path);

		Err(GenError::SnippetNotFound {
			attempted: attempted
				.iter()
				.map(|path| format!("`{}`", path.display()))
				.collect::<Vec<_>>()
				.join(", "),
			lookup: format!("docs/snippets/{language}/{path}"),
		})
	}

	/// Load a snippet as a fenced code block.
	///
	/// Markdown snippets contribute their first fenced block; any other file
	/// is wrapped in a fence tagged from its extension.
	pub fn include_snippet(&self, path: &str, language: &str) -> GenResult<String> {
		let snippet_path = self.resolve_snippet(path, language)?;
		let content = std::fs::read_to_string(&snippet_path)?;
		tracing::debug!(snippet = %snippet_path.display(), "including snippet");

		if snippet_path.extension().is_some_and(|ext| ext == "md") {
			extract_code_block(&content, &snippet_path)
		} else {
			Ok(wrap_code_block(&content, &snippet_path))
		}
	}

	pub fn migration_guide_path(&self, language: &str, version: &str) -> PathBuf {
		self.migration_guides_dir()
			.join(language)
			.join(format!("{version}.md"))
	}

	/// Whether a migration guide exists for this language and version.
	pub fn has_migration_guide(&self, language: &str, version: &str) -> bool {
		self.migration_guide_path(language, version).is_file()
	}

	/// The migration guide text, or an empty string when there is none.
	/// Missing guides are expected, so this never fails.
	pub fn migration_guide(&self, language: &str, version: &str) -> String {
		let guide_path = self.migration_guide_path(language, version);
		if !guide_path.is_file() {
			return String::new();
		}

		match std::fs::read_to_string(&guide_path) {
			Ok(content) => {
				tracing::debug!(guide = %guide_path.display(), "injected migration guide");
				content
			}
			Err(e) => {
				tracing::warn!(guide = %guide_path.display(), "failed to read migration guide: {e}");
				String::new()
			}
		}
	}
}

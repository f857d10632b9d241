use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::AnyResult;

pub const README_CONFIG: &str = r#"version: "2.1.0"
license: MIT
discord_url: https://discord.gg/example
banner_url: https://example.com/banner.png
languages:
  python:
    template: python.md.jinja
    package_name: html-to-markdown
    install: pip install html-to-markdown
  go:
    template: go.md.jinja
    package_name: github.com/example/htmltomarkdown/v2
"#;

pub const PYTHON_TEMPLATE: &str = "# {{ package_name }} v{{ version }}\n\n{{ install }}\n\n{{ \
                                   include_snippet('basic.py', language) }}\nLicense: {{ license \
                                   }}\n\n\n";

pub const GO_TEMPLATE: &str = "# {{ package_name }}\n\n{{ 'usage' | include_snippet(language) \
                               }}{% if language | has_migration(version) %}\n## Migration\n\n{{ \
                               migration_guide }}{% endif %}\n";

pub const CALLBACK_SCHEMA: &str = r#"version: "1.0.0"
metadata:
  total_callbacks: 2
  expected_reduction:
    go: "Go: ~600 lines"
    java: "Java: ~500 lines"
types:
  NodeContext:
    fields: [tag_name, depth]
callbacks:
  - name: visit_text
    returns: VisitResult
  - name: visit_element_start
    returns: VisitResult
generation:
  targets:
    go:
      template: crates/ffi/templates/visitor.go.j2
      output_file: packages/go/v2/visitor_generated.go
    java:
      template: crates/ffi/templates/Visitor.java.j2
      output_file: packages/java/VisitorGenerated.java
"#;

pub const GO_VISITOR_TEMPLATE: &str = "// Code generated for schema {{ version }}. DO NOT \
                                       EDIT.\npackage htmltomarkdown\n\n{% for callback in \
                                       callbacks %}\nfunc {{ callback.name | pascal_case \
                                       }}() {}\n{% endfor %}\n";

pub const JAVA_VISITOR_TEMPLATE: &str = "// {{ metadata.total_callbacks }} callbacks\n{% for \
                                         callback in callbacks %}\nvoid {{ callback.name | \
                                         camel_case }}();\n{% endfor %}\n";

/// A throwaway project directory.
pub struct Project {
	dir: TempDir,
}

impl Project {
	pub fn new() -> AnyResult<Self> {
		Ok(Self {
			dir: tempfile::tempdir()?,
		})
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.dir.path().join(relative)
	}

	/// Write `content` to `relative`, creating parent directories.
	pub fn write(&self, relative: &str, content: &str) -> AnyResult<PathBuf> {
		let path = self.path(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&path, content)?;
		Ok(path)
	}

	pub fn read(&self, relative: &str) -> AnyResult<String> {
		Ok(std::fs::read_to_string(self.path(relative))?)
	}

	/// A README project with python and go languages, templates and
	/// snippets.
	pub fn readme() -> AnyResult<Self> {
		let project = Self::new()?;
		project.write("scripts/readme_config.yaml", README_CONFIG)?;
		project.write("scripts/readme_templates/python.md.jinja", PYTHON_TEMPLATE)?;
		project.write("scripts/readme_templates/go.md.jinja", GO_TEMPLATE)?;
		project.write("docs/snippets/python/basic.py", "print(\"hi\")\n")?;
		project.write(
			"docs/snippets/go/usage.md",
			"# Usage\n\n```go title=\"main.go\"\nfmt.Println(\"hi\")\n```\n",
		)?;
		Ok(project)
	}

	/// A visitor-callback project with go and java targets.
	pub fn visitors() -> AnyResult<Self> {
		let project = Self::new()?;
		project.write(
			"crates/html-to-markdown-ffi/visitor_callbacks.yaml",
			CALLBACK_SCHEMA,
		)?;
		project.write(
			"crates/html-to-markdown-ffi/templates/visitor.go.j2",
			GO_VISITOR_TEMPLATE,
		)?;
		project.write(
			"crates/html-to-markdown-ffi/templates/Visitor.java.j2",
			JAVA_VISITOR_TEMPLATE,
		)?;
		Ok(project)
	}
}

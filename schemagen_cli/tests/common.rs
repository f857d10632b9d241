#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use schemagen_core::AnyResult;
use tempfile::TempDir;

pub fn schemagen_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("schemagen"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write(root: &Path, relative: &str, content: &str) -> AnyResult<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;
	Ok(())
}

/// A project with a README config for `python` and `go`.
pub fn readme_project() -> AnyResult<TempDir> {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();
	write(
		root,
		"scripts/readme_config.yaml",
		"version: \"3.0.0\"\nlanguages:\n  python:\n    package_name: html-to-markdown\n  go:\n    \
		 package_name: htmltomarkdown\n",
	)?;
	write(
		root,
		"scripts/readme_templates/python.md.jinja",
		"# {{ package_name }}\n\n{{ include_snippet('basic.py', language) }}\n",
	)?;
	write(
		root,
		"scripts/readme_templates/go.md.jinja",
		"# {{ package_name }} v{{ version }}\n\nLicense: {{ license }}\n",
	)?;
	write(root, "docs/snippets/python/basic.py", "print(\"hi\")\n")?;
	Ok(tmp)
}

/// A project with a visitor callback schema for `go` and `java`.
pub fn visitor_project() -> AnyResult<TempDir> {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();
	write(
		root,
		"crates/html-to-markdown-ffi/visitor_callbacks.yaml",
		"version: \"1.0.0\"\nmetadata:\n  total_callbacks: 1\n  expected_reduction:\n    go: \
		 \"Go: ~600 lines\"\ntypes: {}\ncallbacks:\n  - name: visit_text\ngeneration:\n  targets:\n    \
		 go:\n      template: templates/visitor.go.j2\n      output_file: \
		 packages/go/visitor_generated.go\n    java:\n      template: templates/Visitor.java.j2\n      \
		 output_file: packages/java/VisitorGenerated.java\n",
	)?;
	write(
		root,
		"crates/html-to-markdown-ffi/templates/visitor.go.j2",
		"package htmltomarkdown\n\n{% for callback in callbacks %}\nfunc {{ callback.name | \
		 pascal_case }}() {}\n{% endfor %}\n",
	)?;
	write(
		root,
		"crates/html-to-markdown-ffi/templates/Visitor.java.j2",
		"{% for callback in callbacks %}\nvoid {{ callback.name | camel_case }}();\n{% endfor %}\n",
	)?;
	Ok(tmp)
}

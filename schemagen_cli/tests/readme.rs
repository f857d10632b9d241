mod common;

use clap::Parser;
use predicates::prelude::PredicateBooleanExt;
use schemagen_cli::Commands;
use schemagen_cli::OutputFormat;
use schemagen_cli::SchemagenCli;
use schemagen_core::AnyEmptyResult;
use schemagen_core::RunMode;
use serde_json::Value;

const PYTHON_README: &str = "# html-to-markdown\n\n```python\nprint(\"hi\")\n```\n";
const GO_README: &str = "# htmltomarkdown v3.0.0\n\nLicense: MIT\n";

#[test]
fn readme_flags_parse() {
	let cli = SchemagenCli::parse_from([
		"schemagen",
		"readme",
		"--language",
		"go",
		"--validate",
		"--diff",
		"--format",
		"json",
	]);
	let Some(Commands::Readme { language, run }) = cli.command else {
		panic!("expected the readme command");
	};
	assert_eq!(language.as_deref(), Some("go"));
	assert_eq!(run.mode(), RunMode::Validate);
	assert!(run.diff);
	assert_eq!(run.format, OutputFormat::Json);
}

#[test]
fn dry_run_conflicts_with_validate() {
	let result = SchemagenCli::try_parse_from(["schemagen", "readme", "--dry-run", "--validate"]);
	assert!(result.is_err());
}

#[test]
fn readme_generates_every_language() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"✓ python: generated packages/python/README.md",
		))
		.stdout(predicates::str::contains(
			"✓ go: generated packages/go/v2/README.md",
		))
		.stdout(predicates::str::contains("Generated 2 target(s)."));

	let python = std::fs::read_to_string(tmp.path().join("packages/python/README.md"))?;
	let go = std::fs::read_to_string(tmp.path().join("packages/go/v2/README.md"))?;
	assert_eq!(python, PYTHON_README);
	assert_eq!(go, GO_README);

	Ok(())
}

#[test]
fn readme_second_run_reports_unchanged() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("unchanged packages/python/README.md"));

	Ok(())
}

#[test]
fn validate_fails_when_missing() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--validate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"✗ python: packages/python/README.md is missing",
		))
		.stdout(predicates::str::contains("2 of 2 output(s) are stale"));

	assert!(!tmp.path().join("packages").exists());

	Ok(())
}

#[test]
fn validate_passes_after_generate() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::schemagen_cmd()
		.arg("readme")
		.arg("--validate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("All 2 output(s) are up to date."));

	Ok(())
}

#[test]
fn validate_diff_shows_changes() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	common::write(
		tmp.path(),
		"packages/go/v2/README.md",
		"# htmltomarkdown v2.0.0\n\nLicense: MIT\n",
	)?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--language")
		.arg("go")
		.arg("--validate")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("is out of date"))
		.stderr(predicates::str::contains("-# htmltomarkdown v2.0.0"))
		.stderr(predicates::str::contains("+# htmltomarkdown v3.0.0"));

	Ok(())
}

#[test]
fn dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"[dry-run] python: would generate packages/python/README.md",
		))
		.stdout(predicates::str::contains("Dry run complete"));

	assert!(!tmp.path().join("packages").exists());

	Ok(())
}

#[test]
fn language_filter_processes_one_target() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--language")
		.arg("go")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("go: generated").and(predicates::str::contains("python").not()));

	assert!(tmp.path().join("packages/go/v2/README.md").is_file());
	assert!(!tmp.path().join("packages/python").exists());

	Ok(())
}

#[test]
fn unknown_language_is_fatal() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--language")
		.arg("cobol")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("unknown target `cobol`"))
		.stderr(predicates::str::contains("schemagen::unknown_target"));

	assert!(!tmp.path().join("packages").exists());

	Ok(())
}

#[test]
fn missing_config_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("configuration file not found"));

	Ok(())
}

#[test]
fn missing_languages_key_is_fatal() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	common::write(
		tmp.path(),
		"scripts/readme_config.yaml",
		"version: \"3.0.0\"\n",
	)?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("missing required key `languages`"));

	assert!(!tmp.path().join("packages").exists());

	Ok(())
}

#[test]
fn broken_template_fails_only_its_language() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	common::write(
		tmp.path(),
		"scripts/readme_templates/python.md.jinja",
		"{{ include_snippet('missing.py', language) }}",
	)?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("✗ python:"))
		.stderr(predicates::str::contains("snippet not found"))
		.stdout(predicates::str::contains("✓ go: generated"))
		.stdout(predicates::str::contains("1 of 2 target(s) failed."));

	assert!(tmp.path().join("packages/go/v2/README.md").is_file());
	assert!(!tmp.path().join("packages/python/README.md").exists());

	Ok(())
}

#[test]
fn json_report() -> AnyEmptyResult {
	let tmp = common::readme_project()?;

	let output = common::schemagen_cmd()
		.arg("readme")
		.arg("--validate")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], false);
	assert_eq!(report["mode"], "validate");
	assert_eq!(report["outcomes"][0]["name"], "python");
	assert_eq!(report["outcomes"][0]["status"], "missing");
	assert_eq!(report["outcomes"][0]["output"], "packages/python/README.md");
	assert_eq!(report["outcomes"][0]["expected"], PYTHON_README);
	assert_eq!(report["outcomes"][1]["name"], "go");

	Ok(())
}

#[test]
fn project_config_moves_inputs() -> AnyEmptyResult {
	let tmp = common::readme_project()?;
	std::fs::rename(
		tmp.path().join("scripts/readme_templates"),
		tmp.path().join("templates"),
	)?;
	common::write(
		tmp.path(),
		"schemagen.toml",
		"[readme]\ntemplates = \"templates\"\npackages = \"bindings\"\n",
	)?;

	common::schemagen_cmd()
		.arg("readme")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("bindings/python/README.md").is_file());
	assert!(tmp.path().join("bindings/go/v2/README.md").is_file());

	Ok(())
}

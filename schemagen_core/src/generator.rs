use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::GenError;
use crate::GenResult;
use crate::template::TemplateRenderer;

/// One named output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
	/// Unique name, e.g. a language code.
	pub name: String,
	/// Template file name relative to the template root.
	pub template: String,
	/// Absolute output path.
	pub output: PathBuf,
}

/// A loaded document viewed as an ordered list of targets.
pub trait TargetPlan {
	/// Targets in the order they are declared.
	fn targets(&self) -> &[Target];

	/// Build a fresh render context for `target`. Called once per render;
	/// contexts are never shared between targets.
	fn context(&self, target: &Target) -> Value;
}

/// What a run does with each rendered artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
	/// Write every target to disk.
	#[default]
	Generate,
	/// Render only and report what would be written.
	DryRun,
	/// Render in memory and compare against the committed output.
	Validate,
}

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
	pub mode: RunMode,
	/// Restrict the run to the target with this name.
	pub only: Option<String>,
}

impl RunOptions {
	pub fn new(mode: RunMode) -> Self {
		Self { mode, only: None }
	}

	#[must_use]
	pub fn only(mut self, name: impl Into<String>) -> Self {
		self.only = Some(name.into());
		self
	}
}

/// Result of processing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TargetStatus {
	/// The file was written.
	Written,
	/// The file already held the rendered content; nothing was written.
	Unchanged,
	/// Dry run: the rendered content that would be written.
	WouldWrite { content: String },
	/// Validate: the committed file matches.
	UpToDate,
	/// Validate: no committed file exists.
	Missing { expected: String },
	/// Validate: the committed file differs from the rendered content.
	OutOfDate { current: String, expected: String },
	/// Rendering or writing failed.
	Failed { message: String },
}

impl TargetStatus {
	/// Whether this outcome counts towards a successful run.
	pub fn is_ok(&self) -> bool {
		matches!(
			self,
			Self::Written | Self::Unchanged | Self::WouldWrite { .. } | Self::UpToDate
		)
	}

	pub fn is_stale(&self) -> bool {
		matches!(self, Self::Missing { .. } | Self::OutOfDate { .. })
	}

	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
	pub name: String,
	pub output: PathBuf,
	#[serde(flatten)]
	pub status: TargetStatus,
}

/// Outcomes of every processed target, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
	pub mode: RunMode,
	pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
	/// True when every processed target succeeded (and, when validating, was
	/// already up to date).
	pub fn is_ok(&self) -> bool {
		self.outcomes.iter().all(|outcome| outcome.status.is_ok())
	}

	pub fn failed(&self) -> impl Iterator<Item = &TargetOutcome> {
		self.outcomes.iter().filter(|o| o.status.is_failed())
	}

	pub fn stale(&self) -> impl Iterator<Item = &TargetOutcome> {
		self.outcomes.iter().filter(|o| o.status.is_stale())
	}

	pub fn succeeded(&self) -> impl Iterator<Item = &TargetOutcome> {
		self.outcomes.iter().filter(|o| o.status.is_ok())
	}

	pub fn get(&self, name: &str) -> Option<&TargetOutcome> {
		self.outcomes.iter().find(|o| o.name == name)
	}
}

/// Select the targets a run processes. An unknown `only` name is a
/// configuration error raised before anything is rendered.
pub fn select_targets<'a>(
	plan: &'a dyn TargetPlan,
	only: Option<&str>,
) -> GenResult<Vec<&'a Target>> {
	let targets = plan.targets();
	let Some(name) = only else {
		return Ok(targets.iter().collect());
	};

	match targets.iter().find(|target| target.name == name) {
		Some(target) => Ok(vec![target]),
		None => {
			Err(GenError::UnknownTarget {
				name: name.to_string(),
				available: targets
					.iter()
					.map(|target| target.name.as_str())
					.collect::<Vec<_>>()
					.join(", "),
			})
		}
	}
}

/// Render one target to its final text, ending in exactly one newline.
pub fn render_target(
	plan: &dyn TargetPlan,
	renderer: &TemplateRenderer,
	target: &Target,
) -> GenResult<String> {
	let context = plan.context(target);
	let rendered = renderer.render(&target.template, &context)?;
	Ok(normalize_trailing_newline(&rendered))
}

/// Strip trailing whitespace and end with a single newline.
pub fn normalize_trailing_newline(content: &str) -> String {
	let mut normalized = content.trim_end().to_string();
	normalized.push('\n');
	normalized
}

/// Process every selected target of `plan`.
///
/// Per-target failures are recorded in the report and never stop the run;
/// only configuration errors (an unknown `only` name) are returned as `Err`.
pub fn run_plan(
	plan: &dyn TargetPlan,
	renderer: &TemplateRenderer,
	options: &RunOptions,
) -> GenResult<RunReport> {
	let targets = select_targets(plan, options.only.as_deref())?;
	let mut outcomes = Vec::with_capacity(targets.len());

	for target in targets {
		let status = match process_target(plan, renderer, target, options.mode) {
			Ok(status) => status,
			Err(e) => {
				tracing::error!(target_name = %target.name, "failed to process target: {e}");
				TargetStatus::Failed {
					message: e.to_string(),
				}
			}
		};

		outcomes.push(TargetOutcome {
			name: target.name.clone(),
			output: target.output.clone(),
			status,
		});
	}

	Ok(RunReport {
		mode: options.mode,
		outcomes,
	})
}

fn process_target(
	plan: &dyn TargetPlan,
	renderer: &TemplateRenderer,
	target: &Target,
	mode: RunMode,
) -> GenResult<TargetStatus> {
	let content = render_target(plan, renderer, target)?;
	let output = &target.output;

	match mode {
		RunMode::Generate => {
			if read_existing(output)?.as_deref() == Some(content.as_bytes()) {
				tracing::info!(output = %output.display(), "unchanged");
				return Ok(TargetStatus::Unchanged);
			}

			if let Some(parent) = output.parent() {
				std::fs::create_dir_all(parent)?;
			}
			std::fs::write(output, &content)?;
			tracing::info!(output = %output.display(), "generated");
			Ok(TargetStatus::Written)
		}
		RunMode::DryRun => {
			tracing::info!(output = %output.display(), "[dry-run] would generate");
			Ok(TargetStatus::WouldWrite { content })
		}
		RunMode::Validate => {
			match read_existing(output)? {
				None => {
					tracing::warn!(output = %output.display(), "output not found");
					Ok(TargetStatus::Missing { expected: content })
				}
				Some(current) if current == content.as_bytes() => {
					tracing::info!(output = %output.display(), "valid");
					Ok(TargetStatus::UpToDate)
				}
				Some(current) => {
					tracing::warn!(output = %output.display(), "out of date");
					Ok(TargetStatus::OutOfDate {
						current: String::from_utf8_lossy(&current).into_owned(),
						expected: content,
					})
				}
			}
		}
	}
}

/// Raw bytes of an existing output. Outputs are compared byte for byte, so a
/// committed file that is not valid UTF-8 is simply out of date.
fn read_existing(path: &Path) -> GenResult<Option<Vec<u8>>> {
	if !path.is_file() {
		return Ok(None);
	}

	Ok(Some(std::fs::read(path)?))
}

use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use schemagen_cli::Commands;
use schemagen_cli::OutputFormat;
use schemagen_cli::RunArgs;
use schemagen_cli::SchemagenCli;
use schemagen_core::GenError;
use schemagen_core::RunMode;
use schemagen_core::RunOptions;
use schemagen_core::RunReport;
use schemagen_core::SchemagenConfig;
use schemagen_core::TargetStatus;
use schemagen_core::readme::ReadmePlan;
use schemagen_core::run_plan;
use schemagen_core::visitors::VisitorPlan;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = SchemagenCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Readme { language, run }) => run_readme(&args, language.as_deref(), run),
		Some(Commands::Visitors { language, run }) => {
			run_visitors(&args, language.as_deref(), run)
		}
		None => {
			eprintln!("No subcommand specified. Run `schemagen --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			match e.downcast::<GenError>() {
				Ok(gen_err) => {
					let report: miette::Report = (*gen_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"schemagen_core=debug"
	} else {
		"schemagen_core=warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &SchemagenCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &SchemagenCli, root: &Path) -> CliResult<SchemagenConfig> {
	let config = SchemagenConfig::load(root)?;
	if args.verbose {
		match SchemagenConfig::resolve_path(root) {
			Some(path) => println!("Using config: {}", make_relative(&path, root)),
			None => println!("No schemagen.toml found, using default paths"),
		}
	}
	Ok(config)
}

fn run_options(run: &RunArgs, only: Option<&str>) -> RunOptions {
	let options = RunOptions::new(run.mode());
	match only {
		Some(name) => options.only(name),
		None => options,
	}
}

/// Generate READMEs. Returns whether every processed target succeeded.
fn run_readme(args: &SchemagenCli, language: Option<&str>, run: &RunArgs) -> CliResult<bool> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let plan = ReadmePlan::load(&root, &config.readme)?;
	let renderer = plan.renderer(root.join(&config.readme.templates))?;

	if args.verbose {
		println!(
			"Loaded README config: {} language(s), version {}",
			plan.config().languages.len(),
			plan.config().version
		);
	}

	let report = run_plan(&plan, &renderer, &run_options(run, language))?;
	print_report(&report, &root, run, args.verbose, "readme");

	Ok(report.is_ok())
}

/// Generate visitor bindings. Returns whether every processed target
/// succeeded.
fn run_visitors(args: &SchemagenCli, language: Option<&str>, run: &RunArgs) -> CliResult<bool> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let plan = VisitorPlan::load(&root, &config.visitors)?;
	let renderer = plan.renderer(root.join(&config.visitors.templates))?;

	let report = run_plan(&plan, &renderer, &run_options(run, language))?;
	print_report(&report, &root, run, args.verbose, "visitors");

	if report.is_ok() && run.format == OutputFormat::Text && run.mode() != RunMode::Validate {
		let schema = plan.schema();
		println!();
		println!("Total callbacks: {}", schema.total_callbacks());
		let reductions = schema.expected_reductions();
		if !reductions.is_empty() {
			println!("Expected code reduction:");
			for reduction in reductions {
				println!("  - {reduction}");
			}
		}
	}

	Ok(report.is_ok())
}

fn print_report(report: &RunReport, root: &Path, run: &RunArgs, verbose: bool, command: &str) {
	if run.format == OutputFormat::Json {
		let outcomes: Vec<serde_json::Value> = report
			.outcomes
			.iter()
			.map(|outcome| {
				let mut value = serde_json::to_value(&outcome.status).unwrap_or_default();
				if let Some(map) = value.as_object_mut() {
					map.insert("name".into(), outcome.name.clone().into());
					map.insert("output".into(), make_relative(&outcome.output, root).into());
				}
				value
			})
			.collect();
		let json = serde_json::json!({
			"ok": report.is_ok(),
			"mode": report.mode,
			"outcomes": outcomes,
		});
		println!(
			"{}",
			serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
		);
		return;
	}

	let ok_mark = colored!("✓", green);
	let fail_mark = colored!("✗", red);

	for outcome in &report.outcomes {
		let rel = make_relative(&outcome.output, root);
		let name = &outcome.name;
		match &outcome.status {
			TargetStatus::Written => println!("{ok_mark} {name}: generated {rel}"),
			TargetStatus::Unchanged => println!("{ok_mark} {name}: unchanged {rel}"),
			TargetStatus::WouldWrite { content } => {
				println!(
					"{} {name}: would generate {rel} ({} bytes)",
					colored!("[dry-run]", yellow),
					content.len()
				);
				if verbose {
					println!("{content}");
				}
			}
			TargetStatus::UpToDate => println!("{ok_mark} {name}: {rel} is up to date"),
			TargetStatus::Missing { expected } => {
				println!("{fail_mark} {name}: {rel} is missing");
				if run.diff {
					print_diff("", expected);
				}
			}
			TargetStatus::OutOfDate { current, expected } => {
				println!("{fail_mark} {name}: {rel} is out of date");
				if run.diff {
					print_diff(current, expected);
				}
			}
			TargetStatus::Failed { message } => {
				eprintln!("{fail_mark} {name}: {message}");
			}
		}
	}

	let failed = report.failed().count();
	let stale = report.stale().count();
	let total = report.outcomes.len();

	println!();
	if failed > 0 {
		println!(
			"{} {failed} of {total} target(s) failed.",
			colored!("error:", red)
		);
	}
	if stale > 0 {
		println!(
			"{} {stale} of {total} output(s) are stale. Run `schemagen {command}` to regenerate.",
			colored!("Validation failed:", red)
		);
	}
	if failed == 0 && stale == 0 {
		let summary = match report.mode {
			RunMode::Generate => format!("Generated {total} target(s)."),
			RunMode::DryRun => format!("Dry run complete: {total} target(s) rendered."),
			RunMode::Validate => format!("All {total} output(s) are up to date."),
		};
		println!("{}", colored!(summary, bold));
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

//! `schemagen_core` generates per-language READMEs and visitor-callback
//! bindings from a single YAML source of truth, and can verify that committed
//! output is still in sync with it.
//!
//! ## Processing Pipeline
//!
//! ```text
//! YAML document
//!   → Schema loader (required keys checked, all-or-nothing)
//!   → Plan (ordered targets + a fresh render context per target)
//!   → Template renderer (minijinja with the filter set installed once)
//!   → Orchestrator (generate, dry-run or validate each target independently)
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: Loading of the visitor-callback schema and README config.
//! - [`config`]: Optional `schemagen.toml` describing where inputs live.
//! - [`code_block`]: Fenced code block extraction and wrapping.
//! - [`performance`]: Benchmark data to markdown tables.
//! - [`docs`]: Snippet and migration-guide lookups.
//! - [`filters`]: The template filter set.
//! - [`template`]: Named template rendering.
//! - [`run_plan`]: Per-target orchestration and run reports.
//! - [`readme`] / [`visitors`]: The two concrete plans.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemagen_core::RunMode;
//! use schemagen_core::RunOptions;
//! use schemagen_core::SchemagenConfig;
//! use schemagen_core::readme::ReadmePlan;
//! use schemagen_core::run_plan;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = SchemagenConfig::load(root).unwrap();
//! let plan = ReadmePlan::load(root, &config.readme).unwrap();
//! let renderer = plan.renderer(root.join(&config.readme.templates)).unwrap();
//!
//! let report = run_plan(&plan, &renderer, &RunOptions::new(RunMode::Validate)).unwrap();
//! if !report.is_ok() {
//!     eprintln!("{} stale README(s)", report.stale().count());
//! }
//! ```

pub use config::*;
pub use error::*;
pub use generator::*;

pub mod code_block;
pub mod config;
pub mod docs;
#[allow(unused_assignments)]
mod error;
pub mod filters;
mod generator;
pub mod performance;
pub mod readme;
pub mod schema;
pub mod template;
pub mod visitors;

#[cfg(test)]
mod __fixtures;

use std::fmt::Write as _;

use serde_json::Map;
use serde_json::Value;

use crate::GenError;
use crate::GenResult;

const DEFAULT_PLATFORM: &str = "Unknown";
const DEFAULT_FUNCTION: &str = "convert()";
const UNKNOWN_FORMAT: &str = "(Unknown benchmark format)";

/// Table shape for one benchmark collection, decided once from the first
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkShape {
	/// `name`, `size`, `latency`, `throughput`.
	Latency,
	/// `name`, `size`, `ops_sec` and, when the first record has it,
	/// `throughput`.
	OpsSec { throughput: bool },
}

impl BenchmarkShape {
	/// Detect the shape from a benchmark record. Returns `None` when the
	/// record has neither `latency` nor `ops_sec`.
	pub fn detect(record: &Map<String, Value>) -> Option<Self> {
		if record.contains_key("latency") {
			Some(Self::Latency)
		} else if record.contains_key("ops_sec") {
			Some(Self::OpsSec {
				throughput: record.contains_key("throughput"),
			})
		} else {
			None
		}
	}

	fn matches(self, record: &Map<String, Value>) -> bool {
		match self {
			Self::Latency => record.contains_key("latency") && !record.contains_key("ops_sec"),
			Self::OpsSec { throughput } => {
				record.contains_key("ops_sec")
					&& !record.contains_key("latency")
					&& record.contains_key("throughput") == throughput
			}
		}
	}

	fn columns(self) -> &'static [&'static str] {
		match self {
			Self::Latency => &["Document", "Size", "Latency", "Throughput"],
			Self::OpsSec { throughput: true } => &["Document", "Size", "Ops/sec", "Throughput"],
			Self::OpsSec { throughput: false } => &["Document", "Size", "Ops/sec"],
		}
	}

	fn label(self) -> &'static str {
		match self {
			Self::Latency => "latency",
			Self::OpsSec { throughput: true } => "ops_sec+throughput",
			Self::OpsSec { throughput: false } => "ops_sec",
		}
	}
}

/// One validated table row, already formatted for output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row(Vec<String>);

/// A benchmark collection whose records all share one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkTable {
	shape: BenchmarkShape,
	rows: Vec<Row>,
}

impl BenchmarkTable {
	/// Validate `records` against the shape of the first one.
	///
	/// Returns `Ok(None)` for an unrecognized first record. A later record
	/// with a different shape, or a record missing a column, is an error.
	pub fn from_records(records: &[Value]) -> GenResult<Option<Self>> {
		let Some(first) = records.first().and_then(Value::as_object) else {
			return Ok(None);
		};
		let Some(shape) = BenchmarkShape::detect(first) else {
			return Ok(None);
		};

		let rows = records
			.iter()
			.enumerate()
			.map(|(index, record)| row_for(shape, index, record))
			.collect::<GenResult<Vec<_>>>()?;

		Ok(Some(Self { shape, rows }))
	}

	pub fn shape(&self) -> BenchmarkShape {
		self.shape
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Render the markdown table, header and separator included.
	pub fn to_markdown(&self) -> String {
		let columns = self.shape.columns();
		let mut table = String::new();
		let _ = writeln!(table, "| {} |", columns.join(" | "));
		let separators: Vec<String> = columns.iter().map(|c| "-".repeat(c.len())).collect();
		let _ = writeln!(table, "| {} |", separators.join(" | "));
		for row in &self.rows {
			let _ = writeln!(table, "| {} |", row.0.join(" | "));
		}
		table
	}
}

fn row_for(shape: BenchmarkShape, index: usize, record: &Value) -> GenResult<Row> {
	let Some(record) = record.as_object().filter(|record| shape.matches(record)) else {
		return Err(GenError::MixedBenchmarkShapes {
			index,
			expected: shape.label().to_string(),
		});
	};

	let field = |name: &str| {
		record
			.get(name)
			.map(display_value)
			.ok_or_else(|| GenError::InvalidBenchmark {
				index,
				field: name.to_string(),
			})
	};
	let ops_sec = || {
		record
			.get("ops_sec")
			.map(group_thousands)
			.ok_or_else(|| GenError::InvalidBenchmark {
				index,
				field: "ops_sec".to_string(),
			})
	};

	let cells = match shape {
		BenchmarkShape::Latency => {
			vec![
				field("name")?,
				field("size")?,
				field("latency")?,
				field("throughput")?,
			]
		}
		BenchmarkShape::OpsSec { throughput: true } => {
			vec![field("name")?, field("size")?, ops_sec()?, field("throughput")?]
		}
		BenchmarkShape::OpsSec { throughput: false } => {
			vec![field("name")?, field("size")?, ops_sec()?]
		}
	};

	Ok(Row(cells))
}

/// Render benchmark data as a markdown section.
///
/// `data` is expected to be a mapping with `platform`, `function`, an
/// optional `note`, and a `benchmarks` list. Missing data, a missing list,
/// or an empty list all render as an empty string.
pub fn render_performance_table(data: &Value, runtime: &str) -> GenResult<String> {
	let Some(data) = data.as_object() else {
		return Ok(String::new());
	};
	let Some(benchmarks) = data.get("benchmarks").and_then(Value::as_array) else {
		return Ok(String::new());
	};
	if benchmarks.is_empty() {
		return Ok(String::new());
	}

	let platform = text_field(data, "platform").unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
	let function = text_field(data, "function").unwrap_or_else(|| DEFAULT_FUNCTION.to_string());
	let note = text_field(data, "note").filter(|note| !note.is_empty());

	let mut output = platform;
	if let Some(note) = note {
		let _ = write!(output, " • {note}");
	}
	let _ = write!(output, " • `{function}` ({runtime})\n\n");

	match BenchmarkTable::from_records(benchmarks)? {
		Some(table) => output.push_str(&table.to_markdown()),
		None => {
			output.push_str(UNKNOWN_FORMAT);
			output.push('\n');
		}
	}

	Ok(output)
}

fn text_field(data: &Map<String, Value>, key: &str) -> Option<String> {
	data.get(key).filter(|v| !v.is_null()).map(display_value)
}

/// Format a value the way it appears in the source document.
fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

/// Comma-group the integer part of a numeric value. Non-numeric values pass
/// through unchanged.
pub fn group_thousands(value: &Value) -> String {
	let Value::Number(number) = value else {
		return display_value(value);
	};

	let raw = number.to_string();
	let (sign, unsigned) = raw
		.strip_prefix('-')
		.map_or(("", raw.as_str()), |rest| ("-", rest));
	let (integer, fraction) = unsigned
		.split_once('.')
		.map_or((unsigned, None), |(i, f)| (i, Some(f)));

	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	match fraction {
		Some(fraction) => format!("{sign}{grouped}.{fraction}"),
		None => format!("{sign}{grouped}"),
	}
}

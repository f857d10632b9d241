use std::path::Path;

use markdown::ParseOptions;
use markdown::mdast::Code;
use markdown::mdast::Node;
use markdown::to_mdast;

use crate::GenError;
use crate::GenResult;

/// Fence marker used for every generated code block.
pub const FENCE: &str = "```";

/// Language used when neither the table nor the file extension gives one.
pub const DEFAULT_LANGUAGE: &str = "text";

/// File extension to fence language tag.
const LANGUAGE_TABLE: &[(&str, &str)] = &[
	("py", "python"),
	("go", "go"),
	("java", "java"),
	("js", "javascript"),
	("ts", "typescript"),
	("rb", "ruby"),
	("php", "php"),
	("cs", "csharp"),
	("rs", "rust"),
	("ex", "elixir"),
	("exs", "elixir"),
	("kt", "kotlin"),
	("swift", "swift"),
	("c", "c"),
	("h", "c"),
	("cpp", "cpp"),
	("sh", "bash"),
];

/// Look up the fence language for a file extension (without the dot).
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
	LANGUAGE_TABLE
		.iter()
		.find(|(ext, _)| *ext == extension)
		.map(|(_, language)| *language)
}

/// Pick the fence tag for a snippet file: the table entry for its extension,
/// then the bare extension, then `text`.
pub fn fence_language(path: &Path) -> String {
	match path.extension().and_then(|ext| ext.to_str()) {
		Some(ext) if !ext.is_empty() => {
			language_for_extension(ext)
				.map_or_else(|| ext.to_string(), ToString::to_string)
		}
		_ => DEFAULT_LANGUAGE.to_string(),
	}
}

/// Extract the first fenced code block from `content` and re-wrap it in a
/// normalized fence.
///
/// The language tag of the original fence is kept (`text` when absent) and
/// attributes such as `title="example.py"` are dropped. Only the first fenced
/// block is ever used, so snippet files must keep their code in a single
/// block. A fence without its closing line does not count, and fences inside
/// raw HTML such as `<details>` do.
pub fn extract_code_block(content: &str, snippet_path: &Path) -> GenResult<String> {
	let Some(block) = first_fenced_block(content)? else {
		return Err(GenError::MissingCodeBlock {
			path: snippet_path.display().to_string(),
		});
	};

	let language = block
		.language
		.as_deref()
		.filter(|lang| !lang.is_empty())
		.unwrap_or(DEFAULT_LANGUAGE);

	Ok(fenced(language, &block.code))
}

/// Wrap raw source in a fenced block tagged for `snippet_path`.
///
/// Content that already starts with a fence is returned untouched so a
/// snippet is never wrapped twice.
pub fn wrap_code_block(content: &str, snippet_path: &Path) -> String {
	if is_fenced(content) {
		return content.to_string();
	}

	fenced(&fence_language(snippet_path), content)
}

/// Wrap raw source in a fence with an explicit language tag.
pub fn wrap_with_language(content: &str, language: &str) -> String {
	if is_fenced(content) {
		return content.to_string();
	}

	let language = if language.is_empty() {
		DEFAULT_LANGUAGE
	} else {
		language
	};
	fenced(language, content)
}

/// Returns true when `content` begins with a fence after leading whitespace.
pub fn is_fenced(content: &str) -> bool {
	content.trim_start().starts_with(FENCE)
}

fn fenced(language: &str, code: &str) -> String {
	format!("{FENCE}{language}\n{}\n{FENCE}\n", code.trim_end())
}

/// A closed fenced block found in a markdown snippet.
struct FencedBlock {
	language: Option<String>,
	code: String,
}

fn first_fenced_block(content: &str) -> GenResult<Option<FencedBlock>> {
	let mdast =
		to_mdast(content, &ParseOptions::gfm()).map_err(|e| GenError::Markdown(e.to_string()))?;
	Ok(find_fenced(&mdast, content))
}

fn find_fenced(node: &Node, source: &str) -> Option<FencedBlock> {
	match node {
		Node::Code(code) if is_closed_fence(code, source) => {
			Some(FencedBlock {
				language: code.lang.clone(),
				code: code.value.clone(),
			})
		}
		Node::Code(_) => None,
		// The markdown parser leaves raw HTML blocks opaque.
		Node::Html(html) => scan_fenced(&html.value),
		_ => {
			node.children()?
				.iter()
				.find_map(|child| find_fenced(child, source))
		}
	}
}

/// Whether the source of `code` opens with a fence and ends with a matching
/// closing fence. Indented code blocks and fences left open to the end of the
/// document both fail.
fn is_closed_fence(code: &Code, source: &str) -> bool {
	let Some(span) = code
		.position
		.as_ref()
		.and_then(|position| source.get(position.start.offset..position.end.offset))
	else {
		return false;
	};

	let mut lines = span.lines();
	let Some(opening) = lines.next().and_then(fence_marker) else {
		return false;
	};
	lines.next_back().is_some_and(|line| closes_fence(line, opening))
}

/// Find the first opening and closing fence line pair in plain text.
fn scan_fenced(text: &str) -> Option<FencedBlock> {
	let mut lines = text.lines();
	while let Some(line) = lines.next() {
		let Some(opening) = fence_marker(line) else {
			continue;
		};
		let info = strip_container(line).trim_start_matches(opening.0).trim();

		let mut code = Vec::new();
		for line in lines.by_ref() {
			if closes_fence(line, opening) {
				return Some(FencedBlock {
					language: info.split_whitespace().next().map(ToString::to_string),
					code: code.join("\n"),
				});
			}
			code.push(line);
		}
		return None;
	}
	None
}

/// The fence character and run length opening `line`, if it is a fence.
fn fence_marker(line: &str) -> Option<(char, usize)> {
	let line = strip_container(line);
	let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
	let length = line.chars().take_while(|c| *c == marker).count();
	(length >= 3).then_some((marker, length))
}

fn closes_fence(line: &str, (marker, length): (char, usize)) -> bool {
	let line = strip_container(line).trim_end();
	line.len() >= length && line.chars().all(|c| c == marker)
}

/// Drop indentation and blockquote markers.
fn strip_container(line: &str) -> &str {
	line.trim_start_matches(|c: char| c == '>' || c.is_whitespace())
}

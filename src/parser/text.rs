//! Source text helpers for tree-sitter nodes.

use std::borrow::Cow;
use tree_sitter::Node;

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

/// Render an expression node as a single line.
///
/// Tokens are copied verbatim and whitespace between tokens on the same line
/// is kept as written. A gap that crosses a line break or a comment becomes
/// one space, or nothing next to brackets and before commas. String literals
/// are atomic: their contents are kept, except that line breaks inside them
/// become escapes (see [`single_line_string`]).
pub fn flatten_text(node: &Node, source: &str) -> String {
    let mut out = String::new();
    let mut last_end: Option<usize> = None;
    let mut broken = false;
    push_tokens(node, source, &mut out, &mut last_end, &mut broken);
    out
}

fn push_tokens(
    node: &Node,
    source: &str,
    out: &mut String,
    last_end: &mut Option<usize>,
    broken: &mut bool,
) {
    if node.kind() == "comment" {
        *broken = true;
        return;
    }

    let atomic = node.child_count() == 0 || node.kind() == "string";
    if !atomic {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            push_tokens(&child, source, out, last_end, broken);
        }
        return;
    }

    let token = node_text(node, source);
    if token.is_empty() {
        return;
    }
    if let Some(end) = *last_end {
        let gap = &source[end..node.start_byte()];
        if *broken || gap.contains('\n') {
            if needs_space(out, token) {
                out.push(' ');
            }
        } else {
            out.push_str(gap);
        }
    }
    if node.kind() == "string" {
        out.push_str(&single_line_string(token));
    } else {
        out.push_str(token);
    }
    *last_end = Some(node.end_byte());
    *broken = false;
}

fn needs_space(out: &str, next: &str) -> bool {
    let after_open = out.ends_with(['(', '[', '{']);
    let before_close = next.starts_with([')', ']', '}', ',']);
    !(after_open || before_close || out.is_empty())
}

/// Rewrite a string literal that spans lines as an equivalent one-line
/// literal.
///
/// Raw line breaks become `\n` escapes and backslash continuations are
/// dropped. Raw strings lose their `r` prefix and have their backslashes
/// doubled so the value stays the same. Single-line literals are returned
/// unchanged.
pub fn single_line_string(token: &str) -> Cow<'_, str> {
    if !token.contains(['\n', '\r']) {
        return Cow::Borrowed(token);
    }
    let Some(quote_start) = token.find(['\'', '"']) else {
        return Cow::Borrowed(token);
    };
    let (prefix, quoted) = token.split_at(quote_start);
    let quote = &quoted[..1];
    let triple = quote.repeat(3);
    let delimiter = if quoted.starts_with(&triple) {
        triple.as_str()
    } else {
        quote
    };
    if quoted.len() < delimiter.len() * 2 || !quoted.ends_with(delimiter) {
        return Cow::Borrowed(token);
    }
    let body = &quoted[delimiter.len()..quoted.len() - delimiter.len()];
    let raw = prefix.contains(['r', 'R']);

    let mut out = String::with_capacity(token.len() + 8);
    out.extend(prefix.chars().filter(|c| !matches!(c, 'r' | 'R')));
    out.push_str(delimiter);

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if raw => {
                out.push_str("\\\\");
                if chars.peek().is_some_and(|next| quote.starts_with(*next)) {
                    out.push('\\');
                }
            }
            '\\' => match chars.peek() {
                Some('\n') => {
                    chars.next();
                }
                Some('\r') => {
                    chars.next();
                    chars.next_if_eq(&'\n');
                }
                Some(_) => {
                    out.push(c);
                    out.extend(chars.next());
                }
                None => out.push(c),
            },
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out.push_str(delimiter);
    Cow::Owned(out)
}

//! Rejects modules the tree-sitter grammar accepts but Python does not.
//!
//! The grammar recovers from a few constructs without leaving an `ERROR`
//! node: misordered parameters, Python 2 statements and dedents that match
//! no enclosing block. Each of these is reported the way a syntax error is.

use super::text::{node_column, node_line};
use crate::errors::{Result, StubgenError};
use std::path::Path;
use tree_sitter::{Node, Point};

/// Fail with a parse error at the first construct Python would reject.
pub fn check_tree(root: &Node, path: &Path) -> Result<()> {
    match first_violation(*root) {
        Some(violation) => Err(StubgenError::parse(
            path,
            node_line(&violation.node),
            node_column(&violation.node),
            violation.message,
        )),
        None => Ok(()),
    }
}

struct Violation<'t> {
    node: Node<'t>,
    message: &'static str,
}

fn violation<'t>(node: Node<'t>, message: &'static str) -> Option<Violation<'t>> {
    Some(Violation { node, message })
}

fn first_violation(node: Node<'_>) -> Option<Violation<'_>> {
    let own = match node.kind() {
        "print_statement" => violation(node, "Python 2 print statement"),
        "exec_statement" => violation(node, "Python 2 exec statement"),
        "parameters" | "lambda_parameters" => parameter_order(node),
        "module" => indentation(node, None),
        "block" => indentation(node, node.parent().map(|owner| owner.start_position())),
        _ => None,
    };
    if own.is_some() {
        return own;
    }

    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(first_violation)
}

fn statements(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Statements that open a line must share one column, deeper than the
/// statement owning the block (column 0 at module level). Statements after
/// `;` or on the header line of their owner are not line openers.
fn indentation(block: Node<'_>, owner: Option<Point>) -> Option<Violation<'_>> {
    let mut expected: Option<usize> = None;
    let mut previous_end_row: Option<usize> = None;

    for statement in statements(block) {
        let start = statement.start_position();
        let inline = owner.is_some_and(|o| o.row == start.row) || previous_end_row == Some(start.row);
        previous_end_row = Some(statement.end_position().row);
        if inline {
            continue;
        }

        match expected {
            None => {
                let deep_enough = match owner {
                    Some(o) => start.column > o.column,
                    None => start.column == 0,
                };
                if !deep_enough {
                    return violation(statement, "unexpected indent");
                }
                expected = Some(start.column);
            }
            Some(column) if start.column > column => {
                return violation(statement, "unexpected indent");
            }
            Some(column) if start.column < column => {
                return violation(
                    statement,
                    "unindent does not match any outer indentation level",
                );
            }
            Some(_) => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plain,
    Defaulted,
    Slash,
    Star { bare: bool },
    DoubleStar,
}

fn shape(param: &Node) -> Shape {
    match param.kind() {
        "default_parameter" | "typed_default_parameter" => Shape::Defaulted,
        "positional_separator" => Shape::Slash,
        "keyword_separator" => Shape::Star { bare: true },
        "list_splat_pattern" => Shape::Star { bare: false },
        "dictionary_splat_pattern" => Shape::DoubleStar,
        "typed_parameter" => {
            let mut cursor = param.walk();
            let inner = param
                .named_children(&mut cursor)
                .map(|child| child.kind())
                .find(|kind| *kind != "type");
            match inner {
                Some("list_splat_pattern") => Shape::Star { bare: false },
                Some("dictionary_splat_pattern") => Shape::DoubleStar,
                _ => Shape::Plain,
            }
        }
        _ => Shape::Plain,
    }
}

/// The ordering rules of a Python parameter list.
fn parameter_order(list: Node<'_>) -> Option<Violation<'_>> {
    let mut seen_named = false;
    let mut seen_default = false;
    let mut seen_slash = false;
    let mut star: Option<Node<'_>> = None;
    let mut bare_star_open = false;
    let mut seen_double_star = false;

    for param in statements(list) {
        if seen_double_star {
            return violation(param, "parameter follows var-keyword parameter");
        }
        match shape(&param) {
            Shape::Plain => {
                if star.is_none() && seen_default {
                    return violation(
                        param,
                        "parameter without a default follows parameter with a default",
                    );
                }
                seen_named = true;
                bare_star_open = false;
            }
            Shape::Defaulted => {
                if star.is_none() {
                    seen_default = true;
                }
                seen_named = true;
                bare_star_open = false;
            }
            Shape::Slash => {
                if seen_slash {
                    return violation(param, "/ may appear only once");
                }
                if star.is_some() {
                    return violation(param, "/ must be ahead of *");
                }
                if !seen_named {
                    return violation(param, "at least one parameter must precede /");
                }
                seen_slash = true;
            }
            Shape::Star { bare } => {
                if star.is_some() {
                    return violation(param, "* may appear only once");
                }
                star = Some(param);
                bare_star_open = bare;
            }
            Shape::DoubleStar => {
                if bare_star_open {
                    return violation(param, "named parameters must follow bare *");
                }
                seen_double_star = true;
            }
        }
    }

    match star {
        Some(bare) if bare_star_open => violation(bare, "named parameters must follow bare *"),
        _ => None,
    }
}

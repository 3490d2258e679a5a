//! Tree-sitter parser integration for Python modules
//!
//! Parses module text with the tree-sitter Python grammar and lowers the
//! concrete tree into the owned declaration tree in [`crate::core::ast`].
//! Lowering is side-effect free and never evaluates an expression.

pub mod text;
mod validate;

use crate::core::ast::{
    AssignmentDecl, Call, ClassDecl, ClassItem, Expr, ExprKind, FunctionDecl, Keyword, Literal,
    Module, ParamDecl,
};
use crate::errors::{Result, StubgenError};
use std::path::Path;
use text::{flatten_text, node_column, node_line, node_text};
use tree_sitter::{Language, Node, Parser, Tree};

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a raw tree-sitter tree
pub fn parse_tree(content: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| StubgenError::ParserSetup(e.to_string()))?;

    parser
        .parse(content, None)
        .ok_or_else(|| StubgenError::parse(path, 1, 1, "parser produced no tree"))
}

/// Parse a module and lower its top-level classes.
///
/// Fails with [`StubgenError::Parse`] at the first `ERROR` or `MISSING`
/// node, or at the first construct the grammar tolerates but Python
/// rejects: misordered parameters, Python 2 statements, stray dedents.
pub fn parse_module(content: &str, path: &Path) -> Result<Module> {
    let tree = parse_tree(content, path)?;
    let root = tree.root_node();

    if let Some(bad) = first_syntax_error(root) {
        return Err(syntax_error(&bad, content, path));
    }
    validate::check_tree(&root, path)?;

    let lowerer = Lowerer { source: content };
    let classes = named_children(&root)
        .iter()
        .filter_map(|stmt| lowerer.class_statement(stmt))
        .collect();

    Ok(Module {
        path: path.to_path_buf(),
        classes,
    })
}

fn first_syntax_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_syntax_error)
}

fn syntax_error(node: &Node, source: &str, path: &Path) -> StubgenError {
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = node_text(node, source)
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(40)
            .collect();
        format!("invalid syntax near `{}`", snippet.trim())
    };
    StubgenError::parse(path, node_line(node), node_column(node), message)
}

/// Named children of a node, comments excluded
fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

struct Lowerer<'s> {
    source: &'s str,
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: &Node) -> &'s str {
        node_text(node, self.source)
    }

    fn class_statement(&self, node: &Node) -> Option<ClassDecl> {
        match node.kind() {
            "class_definition" => Some(self.class_definition(node, Vec::new())),
            "decorated_definition" => {
                let definition = node.child_by_field_name("definition")?;
                (definition.kind() == "class_definition")
                    .then(|| self.class_definition(&definition, self.decorators(node)))
            }
            _ => None,
        }
    }

    fn decorators(&self, node: &Node) -> Vec<Expr> {
        named_children(node)
            .iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| named_children(decorator).first().map(|e| self.expr(e)))
            .collect()
    }

    fn class_definition(&self, node: &Node, decorators: Vec<Expr>) -> ClassDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(&n).to_string())
            .unwrap_or_default();

        // keyword arguments such as `metaclass=` are not bases
        let bases = node
            .child_by_field_name("superclasses")
            .map(|list| {
                named_children(&list)
                    .iter()
                    .filter(|arg| {
                        !matches!(
                            arg.kind(),
                            "keyword_argument" | "dictionary_splat" | "list_splat"
                        )
                    })
                    .map(|arg| self.expr(arg))
                    .collect()
            })
            .unwrap_or_default();

        let body = node
            .child_by_field_name("body")
            .map(|block| {
                named_children(&block)
                    .iter()
                    .map(|stmt| self.class_item(stmt))
                    .collect()
            })
            .unwrap_or_default();

        ClassDecl {
            name,
            line: node_line(node),
            decorators,
            bases,
            body,
        }
    }

    fn class_item(&self, node: &Node) -> ClassItem {
        match node.kind() {
            "function_definition" => ClassItem::Function(self.function(node, Vec::new())),
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(def) if def.kind() == "function_definition" => {
                    ClassItem::Function(self.function(&def, self.decorators(node)))
                }
                _ => ClassItem::Other,
            },
            "expression_statement" => match named_children(node).first() {
                Some(inner) if inner.kind() == "assignment" => {
                    ClassItem::Assignment(self.assignment(inner))
                }
                _ => ClassItem::Other,
            },
            _ => ClassItem::Other,
        }
    }

    fn assignment(&self, node: &Node) -> AssignmentDecl {
        let annotation = node
            .child_by_field_name("type")
            .map(|t| flatten_text(&t, self.source));

        let mut targets = Vec::new();
        let mut current = *node;
        let value = loop {
            if let Some(left) = current.child_by_field_name("left") {
                targets.push(self.expr(&left));
            }
            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                Some(right) => break Some(self.expr(&right)),
                None => break None,
            }
        };

        AssignmentDecl {
            targets,
            annotation,
            value,
            line: node_line(node),
        }
    }

    fn function(&self, node: &Node, decorators: Vec<Expr>) -> FunctionDecl {
        let is_async = node.child(0).is_some_and(|first| first.kind() == "async");
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(&n).to_string())
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|list| {
                named_children(&list)
                    .iter()
                    .map(|param| self.parameter(param))
                    .collect()
            })
            .unwrap_or_default();
        let returns = node
            .child_by_field_name("return_type")
            .map(|t| flatten_text(&t, self.source));

        FunctionDecl {
            name,
            line: node_line(node),
            is_async,
            decorators,
            params,
            returns,
        }
    }

    fn parameter(&self, node: &Node) -> ParamDecl {
        let field = |name: &str| {
            node.child_by_field_name(name)
                .map(|n| flatten_text(&n, self.source))
        };

        match node.kind() {
            "identifier" => ParamDecl::Named {
                name: self.text(node).to_string(),
                annotation: None,
                default: None,
            },
            "default_parameter" | "typed_default_parameter" => ParamDecl::Named {
                name: field("name").unwrap_or_default(),
                annotation: field("type"),
                default: field("value"),
            },
            "typed_parameter" => {
                let annotation = field("type");
                let target = named_children(node)
                    .into_iter()
                    .find(|child| child.kind() != "type");
                match target {
                    Some(inner) if inner.kind() == "list_splat_pattern" => {
                        ParamDecl::VarPositional {
                            name: self.splat_name(&inner),
                            annotation,
                        }
                    }
                    Some(inner) if inner.kind() == "dictionary_splat_pattern" => {
                        ParamDecl::VarKeyword {
                            name: self.splat_name(&inner),
                            annotation,
                        }
                    }
                    Some(inner) => ParamDecl::Named {
                        name: self.text(&inner).to_string(),
                        annotation,
                        default: None,
                    },
                    None => ParamDecl::Named {
                        name: String::new(),
                        annotation,
                        default: None,
                    },
                }
            }
            "list_splat_pattern" => ParamDecl::VarPositional {
                name: self.splat_name(node),
                annotation: None,
            },
            "dictionary_splat_pattern" => ParamDecl::VarKeyword {
                name: self.splat_name(node),
                annotation: None,
            },
            "keyword_separator" => ParamDecl::KeywordSeparator,
            "positional_separator" => ParamDecl::PositionalSeparator,
            other => {
                tracing::debug!(kind = other, line = node_line(node), "unrecognized parameter node");
                ParamDecl::Named {
                    name: flatten_text(node, self.source),
                    annotation: None,
                    default: None,
                }
            }
        }
    }

    fn splat_name(&self, node: &Node) -> String {
        named_children(node)
            .first()
            .map(|inner| self.text(inner).to_string())
            .unwrap_or_else(|| self.text(node).trim_start_matches('*').to_string())
    }

    fn expr(&self, node: &Node) -> Expr {
        let text = flatten_text(node, self.source);
        let kind = match node.kind() {
            "identifier" => ExprKind::Name(text.clone()),
            "attribute" => self.attribute(node),
            "call" => self.call(node),
            "true" => ExprKind::Literal(Literal::Bool(true)),
            "false" => ExprKind::Literal(Literal::Bool(false)),
            "none" => ExprKind::Literal(Literal::None),
            "integer" => ExprKind::Literal(Literal::Int(text.clone())),
            "float" => ExprKind::Literal(Literal::Float(text.clone())),
            "string" | "concatenated_string" if !has_interpolation(node) => {
                ExprKind::Literal(Literal::Str(text.clone()))
            }
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => self.expr(inner).kind,
                _ => ExprKind::Other,
            },
            _ => ExprKind::Other,
        };
        Expr { kind, text }
    }

    fn attribute(&self, node: &Node) -> ExprKind {
        match (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) {
            (Some(object), Some(attr)) => ExprKind::Attribute {
                object: Box::new(self.expr(&object)),
                attr: self.text(&attr).to_string(),
            },
            _ => ExprKind::Other,
        }
    }

    fn call(&self, node: &Node) -> ExprKind {
        let Some(function) = node.child_by_field_name("function") else {
            return ExprKind::Other;
        };
        let mut args = Vec::new();
        let mut keywords = Vec::new();

        if let Some(arguments) = node.child_by_field_name("arguments") {
            if arguments.kind() == "argument_list" {
                for arg in named_children(&arguments) {
                    match arg.kind() {
                        "keyword_argument" => {
                            if let (Some(name), Some(value)) = (
                                arg.child_by_field_name("name"),
                                arg.child_by_field_name("value"),
                            ) {
                                keywords.push(Keyword {
                                    name: Some(self.text(&name).to_string()),
                                    value: self.expr(&value),
                                });
                            }
                        }
                        "dictionary_splat" => keywords.push(Keyword {
                            name: None,
                            value: self.expr(&arg),
                        }),
                        _ => args.push(self.expr(&arg)),
                    }
                }
            } else {
                // bare generator argument: f(x for x in y)
                args.push(self.expr(&arguments));
            }
        }

        ExprKind::Call(Call {
            function: Box::new(self.expr(&function)),
            args,
            keywords,
        })
    }
}

fn has_interpolation(node: &Node) -> bool {
    if node.kind() == "interpolation" {
        return true;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.iter().any(has_interpolation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn parse(source: &str) -> Module {
        parse_module(source, &PathBuf::from("test.py")).expect("valid python")
    }

    fn only_function(class: &ClassDecl) -> &FunctionDecl {
        class
            .body
            .iter()
            .find_map(|item| match item {
                ClassItem::Function(f) => Some(f),
                _ => None,
            })
            .expect("class has a function")
    }

    #[test]
    fn test_parse_error_reports_location() {
        let err = parse_module("class A:\n    def f(:\n", &PathBuf::from("bad.py")).unwrap_err();
        match err {
            StubgenError::Parse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("bad.py"));
                assert!(line >= 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_only_top_level_classes_are_collected() {
        let module = parse(indoc! {"
            import math

            class A:
                class Inner:
                    pass

            def helper():
                class Hidden:
                    pass

            @ugen(ar=True)
            class B(UGen):
                pass
        "});
        let names: Vec<_> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(module.classes[1].decorators.len(), 1);
        assert_eq!(module.classes[1].line, 12);
    }

    #[test]
    fn test_decorator_call_keywords_are_lowered() {
        let module = parse(indoc! {"
            @ugen(ar=True, kr=False, channel_count=2, ir=flag)
            class SinOsc(UGen):
                frequency = param(440.0)
        "});
        let decorator = &module.classes[0].decorators[0];
        let call = decorator.as_call().expect("decorator call");
        assert_eq!(call.callee_name(), Some("ugen"));
        assert_eq!(
            call.keyword("ar").and_then(Expr::as_literal),
            Some(&Literal::Bool(true))
        );
        assert_eq!(
            call.keyword("channel_count").and_then(Expr::as_literal),
            Some(&Literal::Int("2".into()))
        );
        assert_eq!(call.keyword("ir").map(|e| &e.kind), Some(&ExprKind::Name("flag".into())));
    }

    #[test]
    fn test_assignments_keep_chain_targets_and_annotation() {
        let module = parse(indoc! {"
            class A:
                left = right = param(1)
                typed: int = param(2, unexpanded=True)
        "});
        let assignments: Vec<_> = module.classes[0]
            .body
            .iter()
            .filter_map(|item| match item {
                ClassItem::Assignment(a) => Some(a),
                _ => None,
            })
            .collect();
        assert_eq!(assignments.len(), 2);
        let names: Vec<_> = assignments[0]
            .targets
            .iter()
            .filter_map(Expr::as_name)
            .collect();
        assert_eq!(names, vec!["left", "right"]);
        assert_eq!(assignments[1].annotation.as_deref(), Some("int"));
        let call = assignments[1].value.as_ref().and_then(Expr::as_call).unwrap();
        assert_eq!(call.args[0].text, "2");
    }

    #[test]
    fn test_parameters_are_lowered_verbatim() {
        let module = parse(indoc! {"
            class A:
                async def f(self, a, /, b: int = 1, *args: str, c=None, **kw: Any) -> Dict[str, int]:
                    return {}
        "});
        let function = only_function(&module.classes[0]);
        assert!(function.is_async);
        assert_eq!(function.returns.as_deref(), Some("Dict[str, int]"));
        assert_eq!(
            function.params,
            vec![
                ParamDecl::Named {
                    name: "self".into(),
                    annotation: None,
                    default: None
                },
                ParamDecl::Named {
                    name: "a".into(),
                    annotation: None,
                    default: None
                },
                ParamDecl::PositionalSeparator,
                ParamDecl::Named {
                    name: "b".into(),
                    annotation: Some("int".into()),
                    default: Some("1".into())
                },
                ParamDecl::VarPositional {
                    name: "args".into(),
                    annotation: Some("str".into())
                },
                ParamDecl::Named {
                    name: "c".into(),
                    annotation: None,
                    default: Some("None".into())
                },
                ParamDecl::VarKeyword {
                    name: "kw".into(),
                    annotation: Some("Any".into())
                },
            ]
        );
    }

    #[test]
    fn test_keyword_separator_and_decorated_methods() {
        let module = parse(indoc! {"
            class A:
                @classmethod
                def make(cls, *, size: int = 3) -> 'A':
                    ...
        "});
        let function = only_function(&module.classes[0]);
        assert_eq!(function.decorators[0].as_name(), Some("classmethod"));
        assert_eq!(function.params[1], ParamDecl::KeywordSeparator);
        assert_eq!(function.returns.as_deref(), Some("'A'"));
    }

    #[test]
    fn test_fstrings_are_not_literals() {
        let module = parse(indoc! {"
            @ugen(channel_count=f'{n}')
            class A:
                pass
        "});
        let call = module.classes[0].decorators[0].as_call().unwrap();
        assert_eq!(call.keyword("channel_count").unwrap().kind, ExprKind::Other);
    }

    fn rejection(source: &str) -> (usize, String) {
        match parse_module(source, &PathBuf::from("bad.py")) {
            Err(StubgenError::Parse { line, message, .. }) => (line, message),
            Err(other) => panic!("expected parse error, got {other:?}"),
            Ok(_) => panic!("accepted invalid source:\n{source}"),
        }
    }

    #[test]
    fn test_python2_statements_are_rejected() {
        let (line, message) = rejection("class A:\n    pass\n\nprint 'hello'\n");
        assert_eq!(line, 4);
        assert!(message.contains("print"), "{message}");

        let (_, message) = rejection("exec 'x = 1'\n");
        assert!(message.contains("exec"), "{message}");
    }

    #[test]
    fn test_print_and_exec_calls_are_accepted() {
        parse(indoc! {"
            print('hello')
            exec('x = 1')

            class A:
                def show(self):
                    print(self, end='')
        "});
    }

    #[test]
    fn test_parameter_without_default_after_default_is_rejected() {
        let (line, message) = rejection(indoc! {"
            class A:
                def f(self, a=1, b) -> int:
                    return a
        "});
        assert_eq!(line, 2);
        assert!(message.contains("without a default"), "{message}");

        rejection("f = lambda a=1, b: a\n");
        rejection("def f(a=1, /, b):\n    pass\n");
    }

    #[test]
    fn test_repeated_separators_are_rejected() {
        let (_, message) = rejection("class A:\n    def f(self, *, *, a):\n        pass\n");
        assert!(message.contains("only once"), "{message}");

        rejection("def f(a, /, b, /):\n    pass\n");
        rejection("def f(*args, *, a):\n    pass\n");
        rejection("def f(a, *, /, b):\n    pass\n");
        rejection("def f(a, *):\n    pass\n");
        rejection("def f(a, *, **kw):\n    pass\n");
    }

    #[test]
    fn test_valid_parameter_orders_are_accepted() {
        parse(indoc! {"
            class A:
                def f(self, a, /, b=1, *args, c, d=2, **kw):
                    pass
                def g(self, a=1, *, b, c=3):
                    pass
                def h(self, a: int = 1, *args: str, **kw: Any) -> None:
                    pass
            g = lambda x, *, y=1: x
        "});
    }

    #[test]
    fn test_stray_dedent_is_rejected() {
        let source = "class A:\n    def f(self):\n        pass\n  def g(self):\n        pass\n";
        let (line, message) = rejection(source);
        assert_eq!(line, 4);
        assert!(
            message.contains("indent"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn test_misaligned_statements_in_block_are_rejected() {
        rejection("def f():\n    x = 1\n      y = 2\n");
        rejection("  x = 1\n");
    }

    #[test]
    fn test_inline_and_semicolon_statements_are_accepted() {
        parse(indoc! {"
            class A: pass
            class B:
                x = 1; y = 2
                def f(self): return 1
                if True:
                    z = 3
                else: z = 4
            # trailing comment
        "});
    }
}

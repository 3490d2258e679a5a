//! Owned declaration tree produced by the structural parser.
//!
//! Only what stub generation needs survives lowering: top-level classes,
//! their decorators and bases, the functions and assignments in their bodies.
//! Every expression keeps its source text; nothing is evaluated.

use std::path::PathBuf;

/// A parsed source module.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub path: PathBuf,
    pub classes: Vec<ClassDecl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    /// 1-indexed line of the `class` keyword
    pub line: usize,
    pub decorators: Vec<Expr>,
    pub bases: Vec<Expr>,
    pub body: Vec<ClassItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassItem {
    Function(FunctionDecl),
    Assignment(AssignmentDecl),
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub line: usize,
    pub is_async: bool,
    pub decorators: Vec<Expr>,
    pub params: Vec<ParamDecl>,
    pub returns: Option<String>,
}

/// One entry of a `def` parameter list, in source order.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamDecl {
    /// `name`, `name: T`, `name=v`, `name: T = v`
    Named {
        name: String,
        annotation: Option<String>,
        default: Option<String>,
    },
    /// `*args` or `*args: T`
    VarPositional {
        name: String,
        annotation: Option<String>,
    },
    /// `**kwargs` or `**kwargs: T`
    VarKeyword {
        name: String,
        annotation: Option<String>,
    },
    /// bare `*`
    KeywordSeparator,
    /// bare `/`
    PositionalSeparator,
}

/// `a = b = value` or `a: T = value`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentDecl {
    pub targets: Vec<Expr>,
    pub annotation: Option<String>,
    pub value: Option<Expr>,
    pub line: usize,
}

/// An unevaluated expression: its flattened source text plus a shallow
/// classification of its outermost form.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Name(String),
    Attribute { object: Box<Expr>, attr: String },
    Call(Call),
    Literal(Literal),
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub function: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

/// A keyword argument. `name` is `None` for `**mapping` splats.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub name: Option<String>,
    pub value: Expr,
}

/// Literal constants, kept as source text apart from booleans and `None`.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    None,
    Int(String),
    Float(String),
    Str(String),
}

impl Expr {
    pub fn new(kind: ExprKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// The identifier if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Dotted path for names and attribute chains (`abc.ABC`).
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Name(name) => Some(name.clone()),
            ExprKind::Attribute { object, attr } => {
                let base = object.dotted_name()?;
                Some(format!("{}.{}", base, attr))
            }
            _ => None,
        }
    }
}

impl Call {
    /// The callee when it is a bare name, e.g. `param` in `param(1)`.
    pub fn callee_name(&self) -> Option<&str> {
        self.function.as_name()
    }

    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        self.keywords
            .iter()
            .find(|kw| kw.name.as_deref() == Some(name))
            .map(|kw| &kw.value)
    }
}

impl Literal {
    /// Python truthiness of the constant.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Bool(value) => *value,
            Literal::None => false,
            Literal::Int(text) => int_is_nonzero(text),
            Literal::Float(text) => float_is_nonzero(text),
            Literal::Str(text) => !string_is_empty(text),
        }
    }

    /// The constant's `str()` where it can be read off the source text:
    /// booleans, `None`, integers in any base and plain string literals
    /// without escapes. Floats and anything else give `None`.
    pub fn display_value(&self) -> Option<String> {
        match self {
            Literal::Bool(true) => Some("True".to_string()),
            Literal::Bool(false) => Some("False".to_string()),
            Literal::None => Some("None".to_string()),
            Literal::Int(text) => int_value(text).map(|value| value.to_string()),
            Literal::Float(_) => None,
            Literal::Str(text) => plain_string_content(text).map(str::to_string),
        }
    }
}

fn int_value(text: &str) -> Option<u128> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let (digits, radix) = [("0x", 16), ("0o", 8), ("0b", 2)]
        .iter()
        .find_map(|(prefix, radix)| lower.strip_prefix(prefix).map(|d| (d, *radix)))
        .unwrap_or((lower.as_str(), 10));
    u128::from_str_radix(digits, radix).ok()
}

/// Content of a single, unprefixed (or `u`-prefixed) string literal on one
/// line with no backslashes in it.
fn plain_string_content(text: &str) -> Option<&str> {
    let quoted = text.strip_prefix(['u', 'U']).unwrap_or(text);
    let quote = quoted.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let triple = quote.to_string().repeat(3);
    let delimiter = if quoted.starts_with(&triple) && quoted.len() >= 6 {
        triple.as_str()
    } else {
        &quoted[..1]
    };
    let inner = quoted.strip_prefix(delimiter)?.strip_suffix(delimiter)?;
    let plain = !inner.contains(['\\', '\n', '\r']) && !inner.contains(delimiter);
    plain.then_some(inner)
}

fn int_is_nonzero(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let digits = ["0x", "0o", "0b"]
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(&lower);
    digits.chars().any(|c| c != '0' && c != '_')
}

fn float_is_nonzero(text: &str) -> bool {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .trim_end_matches(['j', 'J'])
        .to_string();
    cleaned.parse::<f64>().map(|v| v != 0.0).unwrap_or(true)
}

/// Whether a string literal (or implicit concatenation) has no content.
fn string_is_empty(text: &str) -> bool {
    let mut rest = text.trim();
    while !rest.is_empty() {
        let Some(quote_start) = rest.find(['"', '\'']) else {
            return true;
        };
        let quoted = &rest[quote_start..];
        let quote_char = &quoted[..1];
        let triple = quote_char.repeat(3);
        let delim = if quoted.starts_with(&triple) {
            triple.as_str()
        } else {
            quote_char
        };
        let inner = &quoted[delim.len()..];
        let Some(end) = inner.find(delim) else {
            return false;
        };
        if end > 0 {
            return false;
        }
        rest = inner[end + delim.len()..].trim_start();
    }
    true
}

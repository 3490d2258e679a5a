//! Renders class stubs into `.pyi` text.
//!
//! Rendering is a pure function of its input: the same stubs always produce
//! byte-identical text.

use crate::config::EmitConfig;
use crate::core::stub::{ClassStub, MemberStub, ParamKind, ParameterStub, Signature, StubOrigin};
use crate::synthesis::ANY_TYPE;

const INDENT: &str = "    ";
const EMPTY_BODY: &str = "...";

/// Render a whole stub module.
///
/// Plain classes come first, then synthesized ones; within each group the
/// source order is kept. Every class is followed by one blank line and the
/// text ends with exactly one newline.
pub fn render_module(stubs: &[ClassStub], options: &EmitConfig) -> String {
    let mut lines: Vec<String> = options.header.clone();
    lines.push(String::new());

    let ordered = stubs
        .iter()
        .filter(|s| s.origin == StubOrigin::Introspected)
        .chain(stubs.iter().filter(|s| s.origin == StubOrigin::Synthesized));
    for stub in ordered {
        lines.push(render_class(stub));
        lines.push(String::new());
    }

    let mut text = lines.join("\n").trim_end().to_string();
    text.push('\n');
    text
}

/// Render one class block without a trailing newline.
pub fn render_class(stub: &ClassStub) -> String {
    let mut lines = Vec::with_capacity(stub.members.len() * 2 + 1);
    if stub.bases.is_empty() {
        lines.push(format!("class {}:", stub.name));
    } else {
        lines.push(format!("class {}({}):", stub.name, stub.bases.join(", ")));
    }

    if stub.members.is_empty() {
        lines.push(format!("{INDENT}{EMPTY_BODY}"));
    }
    for member in &stub.members {
        if let Some(decorator) = member.decorator() {
            lines.push(format!("{INDENT}@{decorator}"));
        }
        lines.push(format!("{INDENT}{}", render_member(member)));
    }

    lines.join("\n")
}

/// `def name(params) -> ret: ...` for one member.
pub fn render_member(member: &MemberStub) -> String {
    let signature = member.signature();
    format!(
        "{}def {}({}) -> {}: {}",
        if signature.is_async { "async " } else { "" },
        signature.name,
        render_parameters(&signature.parameters),
        render_return(signature),
        EMPTY_BODY
    )
}

fn render_return(signature: &Signature) -> &str {
    signature.returns.as_deref().unwrap_or(ANY_TYPE)
}

/// Render a parameter list, inserting `/` after the positional-only
/// parameters and a bare `*` before the first keyword-only parameter when
/// no `*args` already opened the keyword-only section.
pub fn render_parameters(parameters: &[ParameterStub]) -> String {
    let mut parts = Vec::with_capacity(parameters.len() + 2);
    let mut previous: Option<ParamKind> = None;
    let mut keyword_section = false;

    for parameter in parameters {
        if previous == Some(ParamKind::PositionalOnly) && parameter.kind != ParamKind::PositionalOnly
        {
            parts.push("/".to_string());
        }
        match parameter.kind {
            ParamKind::VarPositional => keyword_section = true,
            ParamKind::KeywordOnly if !keyword_section => {
                parts.push("*".to_string());
                keyword_section = true;
            }
            _ => {}
        }
        parts.push(render_parameter(parameter));
        previous = Some(parameter.kind);
    }
    if previous == Some(ParamKind::PositionalOnly) {
        parts.push("/".to_string());
    }

    parts.join(", ")
}

fn render_parameter(parameter: &ParameterStub) -> String {
    let prefix = match parameter.kind {
        ParamKind::VarPositional => "*",
        ParamKind::VarKeyword => "**",
        _ => "",
    };
    let mut text = format!("{}{}", prefix, parameter.name);
    if let Some(annotation) = &parameter.annotation {
        text.push_str(": ");
        text.push_str(annotation);
    }
    if let Some(default) = &parameter.default {
        text.push_str(" = ");
        text.push_str(default);
    }
    text
}

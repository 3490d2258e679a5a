//! Signature extraction for plain classes.
//!
//! Declared parameters, annotations, defaults and return annotations are
//! copied as written. Bodies are dropped.

use crate::core::ast::{ClassDecl, ClassItem, FunctionDecl, ParamDecl};
use crate::core::stub::{ClassStub, MemberStub, ParamKind, ParameterStub, Signature, StubOrigin};

/// Underscore-prefixed members that are still part of the public surface.
pub const ALLOWED_SPECIAL_MEMBERS: &[&str] = &["__init__", "__str__", "__repr__", "__plot__"];

const INITIALIZER: &str = "__init__";

/// Reproduce the public signatures of a class that does not use the
/// convention.
pub fn extract_plain(class: &ClassDecl) -> ClassStub {
    let bases = class.bases.iter().filter_map(|b| b.dotted_name()).collect();
    let mut stub = ClassStub::new(&class.name, StubOrigin::Introspected).with_bases(bases);

    for item in &class.body {
        if let ClassItem::Function(function) = item {
            if let Some(member) = member_for(function) {
                stub.push(member);
            }
        }
    }

    stub
}

pub fn is_public_member(name: &str) -> bool {
    !name.starts_with('_') || ALLOWED_SPECIAL_MEMBERS.contains(&name)
}

fn member_for(function: &FunctionDecl) -> Option<MemberStub> {
    if function.name == INITIALIZER {
        let mut signature = signature_of(function);
        signature.returns = Some("None".to_string());
        return Some(MemberStub::Constructor(signature));
    }

    if !is_public_member(&function.name) {
        return None;
    }

    let decorator_names: Vec<String> = function
        .decorators
        .iter()
        .filter_map(|d| d.dotted_name())
        .collect();
    let has = |name: &str| decorator_names.iter().any(|d| d == name);

    if has("property") {
        let mut signature = signature_of(function);
        signature.parameters = vec![ParameterStub::receiver("self")];
        return Some(MemberStub::Property(signature));
    }

    // the getter already declares the property
    if decorator_names
        .iter()
        .any(|d| d.ends_with(".setter") || d.ends_with(".deleter"))
    {
        tracing::debug!(member = %function.name, "skipping property accessor");
        return None;
    }

    let signature = signature_of(function);
    if has("staticmethod") {
        Some(MemberStub::StaticMethod(signature))
    } else if has("classmethod") {
        Some(MemberStub::ClassMethod(signature))
    } else {
        Some(MemberStub::Method(signature))
    }
}

fn signature_of(function: &FunctionDecl) -> Signature {
    Signature {
        name: function.name.clone(),
        is_async: function.is_async,
        parameters: convert_parameters(&function.params),
        returns: function.returns.clone(),
    }
}

/// Convert declared parameters, assigning kinds from the `/` and `*`
/// markers. The markers themselves are implied by the kinds.
pub fn convert_parameters(params: &[ParamDecl]) -> Vec<ParameterStub> {
    let mut out: Vec<ParameterStub> = Vec::with_capacity(params.len());
    let mut keyword_only = false;

    for param in params {
        match param {
            ParamDecl::Named {
                name,
                annotation,
                default,
            } => {
                let kind = if keyword_only {
                    ParamKind::KeywordOnly
                } else {
                    ParamKind::PositionalOrKeyword
                };
                out.push(ParameterStub {
                    name: name.clone(),
                    annotation: annotation.clone(),
                    default: default.clone(),
                    kind,
                });
            }
            ParamDecl::PositionalSeparator => {
                for earlier in out.iter_mut() {
                    if earlier.kind == ParamKind::PositionalOrKeyword {
                        earlier.kind = ParamKind::PositionalOnly;
                    }
                }
            }
            ParamDecl::KeywordSeparator => keyword_only = true,
            ParamDecl::VarPositional { name, annotation } => {
                keyword_only = true;
                out.push(ParameterStub {
                    name: name.clone(),
                    annotation: annotation.clone(),
                    default: None,
                    kind: ParamKind::VarPositional,
                });
            }
            ParamDecl::VarKeyword { name, annotation } => out.push(ParameterStub {
                name: name.clone(),
                annotation: annotation.clone(),
                default: None,
                kind: ParamKind::VarKeyword,
            }),
        }
    }

    out
}

//! Shared in-memory stub model. Both the synthesizer and the generic
//! extractor produce [`ClassStub`]s; the emitter only ever reads them.

/// Which path produced a class stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubOrigin {
    /// Derived from `@ugen` metadata and `param()` descriptors
    Synthesized,
    /// Reproduced from the literal class body
    Introspected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassStub {
    pub name: String,
    pub bases: Vec<String>,
    pub members: Vec<MemberStub>,
    pub origin: StubOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberStub {
    Constructor(Signature),
    Property(Signature),
    ClassMethod(Signature),
    StaticMethod(Signature),
    Method(Signature),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub is_async: bool,
    pub parameters: Vec<ParameterStub>,
    /// Return annotation text; `None` when the source declared none.
    pub returns: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStub {
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
    pub kind: ParamKind,
}

impl ClassStub {
    pub fn new(name: impl Into<String>, origin: StubOrigin) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            members: Vec::new(),
            origin,
        }
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn push(&mut self, member: MemberStub) {
        self.members.push(member);
    }

    pub fn constructor(&self) -> Option<&Signature> {
        self.members.iter().find_map(|m| match m {
            MemberStub::Constructor(sig) => Some(sig),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &Signature> {
        self.members.iter().filter_map(|m| match m {
            MemberStub::Property(sig) => Some(sig),
            _ => None,
        })
    }

    pub fn class_methods(&self) -> impl Iterator<Item = &Signature> {
        self.members.iter().filter_map(|m| match m {
            MemberStub::ClassMethod(sig) => Some(sig),
            _ => None,
        })
    }
}

impl MemberStub {
    pub fn signature(&self) -> &Signature {
        match self {
            MemberStub::Constructor(sig)
            | MemberStub::Property(sig)
            | MemberStub::ClassMethod(sig)
            | MemberStub::StaticMethod(sig)
            | MemberStub::Method(sig) => sig,
        }
    }

    /// Decorator line rendered above the `def`, if any.
    pub fn decorator(&self) -> Option<&'static str> {
        match self {
            MemberStub::Property(_) => Some("property"),
            MemberStub::ClassMethod(_) => Some("classmethod"),
            MemberStub::StaticMethod(_) => Some("staticmethod"),
            MemberStub::Constructor(_) | MemberStub::Method(_) => None,
        }
    }
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_async: false,
            parameters: Vec::new(),
            returns: None,
        }
    }

    pub fn param(mut self, parameter: ParameterStub) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, annotation: impl Into<String>) -> Self {
        self.returns = Some(annotation.into());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterStub> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ParameterStub {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
            kind,
        }
    }

    /// The implicit `self`/`cls` receiver.
    pub fn receiver(name: &str) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    pub fn keyword_only(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordOnly).annotated(annotation)
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn defaulted(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

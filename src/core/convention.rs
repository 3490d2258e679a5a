//! Typed records for the `@ugen` / `param()` convention.

use std::collections::BTreeSet;
use std::fmt;

/// Rate tags recognized as `@ugen` keywords. Declaration order is the
/// order in which rate classmethods are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateTag {
    Ar,
    Kr,
    Ir,
    Dr,
    New,
}

impl RateTag {
    pub const ALL: [RateTag; 5] = [
        RateTag::Ar,
        RateTag::Kr,
        RateTag::Ir,
        RateTag::Dr,
        RateTag::New,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RateTag::Ar => "ar",
            RateTag::Kr => "kr",
            RateTag::Ir => "ir",
            RateTag::Dr => "dr",
            RateTag::New => "new",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == keyword)
    }
}

impl fmt::Display for RateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_CHANNEL_COUNT: &str = "1";

/// Configuration carried by one `@ugen(...)` decorator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorMetadata {
    pub rates: BTreeSet<RateTag>,
    pub is_multichannel: bool,
    pub fixed_channel_count: bool,
    /// Literal text of `channel_count=`, rendered as the parameter default
    pub channel_count: String,
}

impl Default for DecoratorMetadata {
    fn default() -> Self {
        Self {
            rates: BTreeSet::new(),
            is_multichannel: false,
            fixed_channel_count: false,
            channel_count: DEFAULT_CHANNEL_COUNT.to_string(),
        }
    }
}

impl DecoratorMetadata {
    /// Whether synthesized signatures take a `channel_count` parameter.
    pub fn takes_channel_count(&self) -> bool {
        self.is_multichannel && !self.fixed_channel_count
    }
}

/// One `name = param(...)` attribute of a convention class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub default: Option<String>,
    pub unexpanded: bool,
}

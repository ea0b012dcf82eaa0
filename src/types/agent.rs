//! Agent kinds and the families they belong to.

use crate::error::{Error, ErrorContext};
use crate::error_code::ErrorKind;
use crate::validation::quoted_choices;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing family of an agent. `-light` agents share the family of their full tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentFamily {
    Research,
    Qualification,
    Copywriting,
    Timing,
    Classification,
}

impl AgentFamily {
    pub const ALL: [AgentFamily; 5] = [
        Self::Research,
        Self::Qualification,
        Self::Copywriting,
        Self::Timing,
        Self::Classification,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Qualification => "qualification",
            Self::Copywriting => "copywriting",
            Self::Timing => "timing",
            Self::Classification => "classification",
        }
    }

    /// The full and light agent of this family.
    pub fn kinds(&self) -> [AgentKind; 2] {
        [AgentKind::new(*self, false), AgentKind::new(*self, true)]
    }
}

impl fmt::Display for AgentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discriminator of run requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "r1")]
    R1,
    #[serde(rename = "r1-light")]
    R1Light,
    #[serde(rename = "r1-qualification")]
    R1Qualification,
    #[serde(rename = "r1-qualification-light")]
    R1QualificationLight,
    #[serde(rename = "r1-copywriting")]
    R1Copywriting,
    #[serde(rename = "r1-copywriting-light")]
    R1CopywritingLight,
    #[serde(rename = "r1-timing")]
    R1Timing,
    #[serde(rename = "r1-timing-light")]
    R1TimingLight,
    #[serde(rename = "r1-classification")]
    R1Classification,
    #[serde(rename = "r1-classification-light")]
    R1ClassificationLight,
}

impl AgentKind {
    pub const ALL: [AgentKind; 10] = [
        Self::R1,
        Self::R1Light,
        Self::R1Qualification,
        Self::R1QualificationLight,
        Self::R1Copywriting,
        Self::R1CopywritingLight,
        Self::R1Timing,
        Self::R1TimingLight,
        Self::R1Classification,
        Self::R1ClassificationLight,
    ];

    pub fn new(family: AgentFamily, light: bool) -> Self {
        match (family, light) {
            (AgentFamily::Research, false) => Self::R1,
            (AgentFamily::Research, true) => Self::R1Light,
            (AgentFamily::Qualification, false) => Self::R1Qualification,
            (AgentFamily::Qualification, true) => Self::R1QualificationLight,
            (AgentFamily::Copywriting, false) => Self::R1Copywriting,
            (AgentFamily::Copywriting, true) => Self::R1CopywritingLight,
            (AgentFamily::Timing, false) => Self::R1Timing,
            (AgentFamily::Timing, true) => Self::R1TimingLight,
            (AgentFamily::Classification, false) => Self::R1Classification,
            (AgentFamily::Classification, true) => Self::R1ClassificationLight,
        }
    }

    /// Wire tag, e.g. `"r1-timing-light"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::R1 => "r1",
            Self::R1Light => "r1-light",
            Self::R1Qualification => "r1-qualification",
            Self::R1QualificationLight => "r1-qualification-light",
            Self::R1Copywriting => "r1-copywriting",
            Self::R1CopywritingLight => "r1-copywriting-light",
            Self::R1Timing => "r1-timing",
            Self::R1TimingLight => "r1-timing-light",
            Self::R1Classification => "r1-classification",
            Self::R1ClassificationLight => "r1-classification-light",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    pub fn family(&self) -> AgentFamily {
        match self {
            Self::R1 | Self::R1Light => AgentFamily::Research,
            Self::R1Qualification | Self::R1QualificationLight => AgentFamily::Qualification,
            Self::R1Copywriting | Self::R1CopywritingLight => AgentFamily::Copywriting,
            Self::R1Timing | Self::R1TimingLight => AgentFamily::Timing,
            Self::R1Classification | Self::R1ClassificationLight => AgentFamily::Classification,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(
            self,
            Self::R1Light
                | Self::R1QualificationLight
                | Self::R1CopywritingLight
                | Self::R1TimingLight
                | Self::R1ClassificationLight
        )
    }

    /// `'r1' | 'r1-light' | ...`, used in discriminator and enum messages.
    pub(crate) fn expected_tags() -> String {
        quoted_choices(Self::ALL.iter().map(|k| k.as_str()))
    }

    pub(crate) fn tags() -> [&'static str; 10] {
        Self::ALL.map(|k| k.as_str())
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            Error::with_context(
                ErrorKind::ValidationError,
                format!(
                    "Invalid agent '{}'. Expected {}",
                    s,
                    Self::expected_tags()
                ),
                ErrorContext::new().with_field_path("agent"),
            )
        })
    }
}

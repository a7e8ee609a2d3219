//! Abuse categories offered to reporters and the numbered menus that select them.
//!
//! Every menu maps a single-digit choice (`"1"`, `"2"`, ...) to a variant.
//! The same tables drive validation, menu rendering and the uppercased
//! labels embedded in report types.

use std::fmt;

/// Top-level abuse type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbuseType {
    Bullying,
    SuicideSelfHarm,
    SexuallyExplicit,
    Misinformation,
    HateSpeech,
    Danger,
}

/// Second-level drill-down under [`AbuseType::Misinformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MisinfoCategory {
    Health,
    Advertisement,
    News,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthCategory {
    Emergency,
    MedicalResearch,
    Reproductive,
    Treatments,
    Alternative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsCategory {
    Historical,
    Political,
    Science,
}

/// Leaf selection below a misinformation sub-category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificCategory {
    Health(HealthCategory),
    News(NewsCategory),
}

/// A closed set of menu options.
///
/// `OPTIONS` is in menu order; the choice for an entry is its 1-based index.
pub trait MenuOption: Copy + Sized + 'static {
    const OPTIONS: &'static [Self];

    /// Lowercase human-readable label.
    fn label(self) -> &'static str;

    /// Label as it appears in menus and report types.
    fn upper_label(self) -> String {
        self.label().to_uppercase()
    }

    /// Resolve a reply such as `" 3 "` to its option.
    fn from_choice(input: &str) -> Option<Self> {
        let index: usize = input.trim().parse().ok()?;
        // Reject "+1", "01" and friends: only the bare digit is a recognized key.
        if input.trim() != index.to_string() {
            return None;
        }
        index.checked_sub(1).and_then(|i| Self::OPTIONS.get(i).copied())
    }

    /// Numbered option lines, e.g. `"1. BULLYING\n2. ..."`.
    fn menu_lines() -> String {
        Self::OPTIONS
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {}", i + 1, option.upper_label()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl MenuOption for AbuseType {
    const OPTIONS: &'static [Self] = &[
        Self::Bullying,
        Self::SuicideSelfHarm,
        Self::SexuallyExplicit,
        Self::Misinformation,
        Self::HateSpeech,
        Self::Danger,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Bullying => "bullying",
            Self::SuicideSelfHarm => "suicide/self-harm",
            Self::SexuallyExplicit => "sexually explicit/nudity",
            Self::Misinformation => "misinformation",
            Self::HateSpeech => "hate speech",
            Self::Danger => "danger",
        }
    }
}

impl MenuOption for MisinfoCategory {
    const OPTIONS: &'static [Self] = &[Self::Health, Self::Advertisement, Self::News];

    fn label(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Advertisement => "advertisement",
            Self::News => "news",
        }
    }
}

impl MenuOption for HealthCategory {
    const OPTIONS: &'static [Self] = &[
        Self::Emergency,
        Self::MedicalResearch,
        Self::Reproductive,
        Self::Treatments,
        Self::Alternative,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::MedicalResearch => "medical research",
            Self::Reproductive => "reproductive healthcare",
            Self::Treatments => "treatments",
            Self::Alternative => "alternative medicine",
        }
    }
}

impl MenuOption for NewsCategory {
    const OPTIONS: &'static [Self] = &[Self::Historical, Self::Political, Self::Science];

    fn label(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Political => "political",
            Self::Science => "science",
        }
    }
}

impl AbuseType {
    /// Map a classifier label onto an abuse type.
    ///
    /// Matching ignores case, surrounding whitespace and quotes/punctuation,
    /// and accepts variant spellings (`hate_speech`, `HateSpeech`) plus a few
    /// short aliases. `unknown`, empty and unrecognized labels yield `None`.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        let cleaned: String = raw
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        if let Some(found) = Self::OPTIONS.iter().find(|t| t.label() == cleaned) {
            return Some(*found);
        }

        // Collapse separators so "hate_speech", "hate-speech" and "HateSpeech" agree.
        let compact: String = cleaned.chars().filter(|c| c.is_alphanumeric()).collect();
        match compact.as_str() {
            "bullying" | "bully" | "harassment" => Some(Self::Bullying),
            "suicide" | "selfharm" | "suicideselfharm" => Some(Self::SuicideSelfHarm),
            "explicit" | "nudity" | "sexuallyexplicit" | "sexuallyexplicitnudity" => {
                Some(Self::SexuallyExplicit)
            }
            "misinformation" | "misinfo" => Some(Self::Misinformation),
            "hate" | "hatespeech" => Some(Self::HateSpeech),
            "danger" | "dangerous" => Some(Self::Danger),
            _ => None,
        }
    }
}

macro_rules! display_upper {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.upper_label())
            }
        })*
    };
}

display_upper!(AbuseType, MisinfoCategory, HealthCategory, NewsCategory);

// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Climbing grades on the YDS and V scales.
//!
//! Each scale is totally ordered by declaration position. `GradeValue`
//! orders every YDS grade before every V grade; that rule only exists so
//! mixed lists sort deterministically and says nothing about difficulty.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// YDS labels in ascending order, lowercase canonical form.
const YDS_LABELS: [&str; 30] = [
    "5.4", "5.5", "5.6", "5.7", "5.8", "5.9", //
    "5.10a", "5.10b", "5.10c", "5.10d", //
    "5.11a", "5.11b", "5.11c", "5.11d", //
    "5.12a", "5.12b", "5.12c", "5.12d", //
    "5.13a", "5.13b", "5.13c", "5.13d", //
    "5.14a", "5.14b", "5.14c", "5.14d", //
    "5.15a", "5.15b", "5.15c", "5.15d",
];

const V_MAX: u8 = 17;

/// Input that is not a grade on either scale.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized climbing grade: {input:?}")]
pub struct GradeParseError {
    pub input: String,
}

impl GradeParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Lowercase with all whitespace removed.
fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

// ─── YDS ─────────────────────────────────────────────────────────────────────

/// Yosemite Decimal System grade, 5.4 through 5.15d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YdsGrade(u8);

impl YdsGrade {
    pub const COUNT: usize = YDS_LABELS.len();

    /// Position in the scale, 0 for 5.4.
    pub fn order_index(&self) -> usize {
        usize::from(self.0)
    }

    pub fn all() -> impl Iterator<Item = YdsGrade> {
        (0..Self::COUNT).map(|i| Self(i as u8))
    }

    /// Display form, e.g. "5.11C".
    pub fn display(&self) -> String {
        YDS_LABELS[self.order_index()].to_uppercase()
    }

    fn parse_normalized(key: &str) -> Option<Self> {
        let candidate = if key.starts_with("5.") {
            key.to_string()
        } else if let Some(rest) = key.strip_prefix('5') {
            format!("5.{rest}")
        } else if key.starts_with(|c: char| c.is_ascii_digit()) {
            format!("5.{key}")
        } else {
            return None;
        };

        YDS_LABELS
            .iter()
            .position(|label| *label == candidate)
            .map(|i| Self(i as u8))
    }
}

impl fmt::Display for YdsGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for YdsGrade {
    type Err = GradeParseError;

    /// Accepts "5.10c", "5.10C", "510c", "10c", " 5.9 ".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_normalized(&normalize(s)).ok_or_else(|| GradeParseError::new(s))
    }
}

// ─── V scale ─────────────────────────────────────────────────────────────────

/// Bouldering grade, V0 through V17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VGrade(u8);

impl VGrade {
    pub fn new(number: u8) -> Option<Self> {
        (number <= V_MAX).then_some(Self(number))
    }

    pub fn order_index(&self) -> usize {
        usize::from(self.0)
    }

    pub fn all() -> impl Iterator<Item = VGrade> {
        (0..=V_MAX).map(Self)
    }

    /// Display form, e.g. "V7".
    pub fn display(&self) -> String {
        format!("V{}", self.0)
    }

    fn parse_normalized(key: &str) -> Option<Self> {
        let digits = key.strip_prefix('v').unwrap_or(key);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        // "07" -> 7; all-zero strings collapse to 0.
        let trimmed = digits.trim_start_matches('0');
        let number: u8 = if trimmed.is_empty() {
            0
        } else {
            trimmed.parse().ok()?
        };
        Self::new(number)
    }
}

impl fmt::Display for VGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for VGrade {
    type Err = GradeParseError;

    /// Accepts "v7", "V07", " v 10 " and bare numbers such as "7".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_normalized(&normalize(s)).ok_or_else(|| GradeParseError::new(s))
    }
}

// ─── GradeValue ──────────────────────────────────────────────────────────────

/// A grade on either scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradeValue {
    Yds(YdsGrade),
    V(VGrade),
}

impl GradeValue {
    pub fn display(&self) -> String {
        match self {
            GradeValue::Yds(g) => g.display(),
            GradeValue::V(g) => g.display(),
        }
    }

    pub fn order_index(&self) -> usize {
        match self {
            GradeValue::Yds(g) => g.order_index(),
            GradeValue::V(g) => g.order_index(),
        }
    }
}

impl fmt::Display for GradeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for GradeValue {
    type Err = GradeParseError;

    /// Tries YDS first, then V. A bare "7" is therefore 5.7, while "12"
    /// (no letterless 5.12) falls through to V12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        YdsGrade::parse_normalized(&key)
            .map(GradeValue::Yds)
            .or_else(|| VGrade::parse_normalized(&key).map(GradeValue::V))
            .ok_or_else(|| GradeParseError::new(s))
    }
}

impl From<YdsGrade> for GradeValue {
    fn from(g: YdsGrade) -> Self {
        GradeValue::Yds(g)
    }
}

impl From<VGrade> for GradeValue {
    fn from(g: VGrade) -> Self {
        GradeValue::V(g)
    }
}

/// Scale tag used by the object wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScale {
    Yds,
    V,
}

/// Wire shapes of a grade. Encoding always uses `Display`; decoding also
/// accepts the `{"scale", "value"}` object the coordinator sometimes emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradeRepr {
    Display(String),
    Scaled { scale: GradeScale, value: String },
}

impl From<GradeValue> for GradeRepr {
    fn from(grade: GradeValue) -> Self {
        GradeRepr::Display(grade.display())
    }
}

impl TryFrom<GradeRepr> for GradeValue {
    type Error = GradeParseError;

    fn try_from(repr: GradeRepr) -> Result<Self, Self::Error> {
        match repr {
            GradeRepr::Display(s) => s.parse(),
            GradeRepr::Scaled {
                scale: GradeScale::Yds,
                value,
            } => value.parse().map(GradeValue::Yds),
            GradeRepr::Scaled {
                scale: GradeScale::V,
                value,
            } => value.parse().map(GradeValue::V),
        }
    }
}

impl Serialize for GradeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for GradeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        GradeRepr::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yds(s: &str) -> GradeValue {
        GradeValue::Yds(s.parse().unwrap())
    }

    #[test]
    fn test_loose_input_matches_canonical() {
        let cases = [
            ("v7", "V7"),
            (" V07 ", "V7"),
            ("v 10", "V10"),
            ("5.10c", "5.10C"),
            ("5.10C", "5.10C"),
            (" 510c", "5.10C"),
            ("10c", "5.10C"),
            ("5.9", "5.9"),
            ("V0", "V0"),
            ("v00", "V0"),
        ];
        for (input, canonical) in cases {
            let parsed: GradeValue = input.parse().unwrap();
            let reparsed: GradeValue = canonical.parse().unwrap();
            assert_eq!(parsed, reparsed, "input {input:?}");
            assert_eq!(parsed.display(), canonical);
        }
    }

    #[test]
    fn test_every_grade_reparses_from_display() {
        for g in YdsGrade::all() {
            let value = GradeValue::Yds(g);
            assert_eq!(value.display().parse::<GradeValue>(), Ok(value));
            assert_eq!(value.display().to_lowercase().parse::<GradeValue>(), Ok(value));
        }
        for g in VGrade::all() {
            let value = GradeValue::V(g);
            assert_eq!(value.display().parse::<GradeValue>(), Ok(value));
        }
        assert_eq!(YdsGrade::all().count(), 30);
        assert_eq!(VGrade::all().count(), 18);
    }

    #[test]
    fn test_bare_numbers_prefer_yds() {
        assert_eq!("7".parse::<GradeValue>(), Ok(yds("5.7")));
        assert_eq!("12".parse::<GradeValue>(), Ok(GradeValue::V(VGrade::new(12).unwrap())));
    }

    #[test]
    fn test_out_of_range_rejected() {
        for input in ["V18", "5.16a", "5.3", "5.10e", "v", "", "hard", "V7+"] {
            assert!(input.parse::<GradeValue>().is_err(), "{input:?} should fail");
        }
    }

    #[test]
    fn test_ordering_within_and_across_scales() {
        assert!(yds("5.9") < yds("5.10a"));
        assert!(yds("5.10d") < yds("5.11a"));
        let v2 = GradeValue::V(VGrade::new(2).unwrap());
        let v10 = GradeValue::V(VGrade::new(10).unwrap());
        assert!(v2 < v10);
        // Cross-scale rule: any YDS grade sorts before any V grade.
        assert!(yds("5.15d") < GradeValue::V(VGrade::new(0).unwrap()));
    }

    #[test]
    fn test_serializes_as_display_string() {
        assert_eq!(serde_json::to_string(&yds("5.11c")).unwrap(), "\"5.11C\"");
        let v: GradeValue = serde_json::from_str("\"v5\"").unwrap();
        assert_eq!(v.display(), "V5");
    }

    #[test]
    fn test_deserializes_scaled_object_form() {
        let g: GradeValue = serde_json::from_str(r#"{"scale":"yds","value":"5.10a"}"#).unwrap();
        assert_eq!(g, yds("5.10a"));
        let g: GradeValue = serde_json::from_str(r#"{"scale":"v","value":"V7"}"#).unwrap();
        assert_eq!(g.display(), "V7");

        // Scale must agree with the value.
        assert!(serde_json::from_str::<GradeValue>(r#"{"scale":"v","value":"5.10a"}"#).is_err());
        assert!(serde_json::from_str::<GradeValue>(r#"{"scale":"font","value":"7a"}"#).is_err());
    }
}

// Scenario tag extraction - derive categorical tags from free-text scenario labels
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

lazy_static! {
    /// Phrase after a `set-off:` marker. Letters, whitespace and hyphens only,
    /// so the capture ends at the next pipe (or any other punctuation).
    static ref SETOFF_CAPTURE: Regex = Regex::new(r"set-off\s*:\s*([a-z\s-]+)").unwrap();
    static ref PIPE_SEPARATOR: Regex = Regex::new(r"\s*\|\s*").unwrap();
}

/// Settlement approach named in the scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Approach {
    #[serde(rename = "Judgement Based")]
    JudgementBased,
    #[serde(rename = "Coles Based")]
    ColesBased,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Approach {
    pub fn name(&self) -> &'static str {
        match self {
            Approach::JudgementBased => "Judgement Based",
            Approach::ColesBased => "Coles Based",
            Approach::Unknown => "Unknown",
        }
    }
}

/// Fair Work Ombudsman cut status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fwo {
    #[serde(rename = "Without FWO")]
    WithoutFwo,
    #[serde(rename = "With FWO")]
    WithFwo,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Fwo {
    pub fn name(&self) -> &'static str {
        match self {
            Fwo::WithoutFwo => "Without FWO",
            Fwo::WithFwo => "With FWO",
            Fwo::Unknown => "Unknown",
        }
    }
}

/// Period over which the set-off is applied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetOff {
    PayPeriod,
    Annual,
    BiAnnual,
    /// Captured phrase that is not one of the known periods (already title-cased)
    Other(String),
    Unknown,
}

impl SetOff {
    pub fn name(&self) -> &str {
        match self {
            SetOff::PayPeriod => "Pay Period",
            SetOff::Annual => "Annual",
            SetOff::BiAnnual => "Bi Annual",
            SetOff::Other(phrase) => phrase,
            SetOff::Unknown => "Unknown",
        }
    }

    /// Map a title-cased captured phrase onto a known period when it spells one
    fn from_phrase(phrase: String) -> Self {
        match phrase.as_str() {
            "Pay Period" => SetOff::PayPeriod,
            "Annual" => SetOff::Annual,
            "Bi Annual" | "Bi-Annual" | "Biannual" => SetOff::BiAnnual,
            _ => SetOff::Other(phrase),
        }
    }
}

impl Serialize for SetOff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// 557C condition variant (Coles scenarios)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cond557c {
    #[serde(rename = "All Shifts")]
    AllShifts,
    #[serde(rename = "Non-Clocked Shifts")]
    NonClockedShifts,
    #[serde(rename = "557C (Unspecified)")]
    Unspecified,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Cond557c {
    pub fn name(&self) -> &'static str {
        match self {
            Cond557c::AllShifts => "All Shifts",
            Cond557c::NonClockedShifts => "Non-Clocked Shifts",
            Cond557c::Unspecified => "557C (Unspecified)",
            Cond557c::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Clause {
    #[serde(rename = "28.11")]
    Clause2811,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Clause {
    pub fn name(&self) -> &'static str {
        match self {
            Clause::Clause2811 => "28.11",
            Clause::Unknown => "Unknown",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(Approach, Fwo, SetOff, Cond557c, Clause);

/// Tags derived from one scenario description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioTags {
    pub approach: Approach,
    pub fwo: Fwo,
    pub setoff: SetOff,
    #[serde(rename = "cond_557c")]
    pub cond557c: Cond557c,
    pub clause: Clause,
    pub label: String,
}

/// Extract tags from a scenario description.
///
/// Total over all inputs: anything unrecognised maps to `Unknown` (or
/// `NotApplicable` for the 557C condition). Matching is substring based on a
/// lowercased copy; only `label` keeps the original casing.
pub fn extract(text: &str) -> ScenarioTags {
    let t = text.to_lowercase();

    ScenarioTags {
        approach: approach_of(&t),
        fwo: fwo_of(&t),
        setoff: setoff_of(&t),
        cond557c: cond557c_of(&t),
        clause: if t.contains("28.11") {
            Clause::Clause2811
        } else {
            Clause::Unknown
        },
        label: clean_label(text),
    }
}

fn approach_of(t: &str) -> Approach {
    if t.contains("judgement based") {
        Approach::JudgementBased
    } else if t.contains("coles based") {
        Approach::ColesBased
    } else {
        Approach::Unknown
    }
}

fn fwo_of(t: &str) -> Fwo {
    // "with fwo" is a substring of "without fwo"
    if t.contains("without fwo") {
        Fwo::WithoutFwo
    } else if t.contains("with fwo") || t.contains("after fwo") {
        Fwo::WithFwo
    } else {
        Fwo::Unknown
    }
}

/// Prefer the phrase after `set-off:`, degrade to a keyword scan when there is
/// no usable capture.
fn setoff_of(t: &str) -> SetOff {
    if !t.contains("set-off") {
        return SetOff::Unknown;
    }

    if let Some(phrase) = SETOFF_CAPTURE
        .captures(t)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|phrase| !phrase.is_empty())
    {
        return SetOff::from_phrase(title_case(phrase));
    }

    // "annual" also matches inside "bi-annual"; order kept as-is
    if t.contains("pay period") {
        SetOff::PayPeriod
    } else if t.contains("annual") {
        SetOff::Annual
    } else if t.contains("bi annual") || t.contains("bi-annual") || t.contains("biannual") {
        SetOff::BiAnnual
    } else {
        SetOff::Unknown
    }
}

fn cond557c_of(t: &str) -> Cond557c {
    if !t.contains("557c") {
        return Cond557c::NotApplicable;
    }

    if t.contains("all shifts") {
        Cond557c::AllShifts
    } else if t.contains("non-clocked") || t.contains("non clocked") {
        Cond557c::NonClockedShifts
    } else {
        Cond557c::Unspecified
    }
}

/// Display form of a scenario description: fixes the "Apporach" typo and
/// normalises pipe separators to ` | `. Idempotent.
pub fn clean_label(text: &str) -> String {
    let fixed = text.replace("Apporach", "Approach");
    PIPE_SEPARATOR
        .replace_all(&fixed, " | ")
        .trim()
        .to_string()
}

/// Uppercase the first letter of every word, lowercase the rest. A word starts
/// after any non-alphabetic character, so "non-clocked" becomes "Non-Clocked".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_all_unknown() {
        let tags = extract("");
        assert_eq!(tags.approach, Approach::Unknown);
        assert_eq!(tags.fwo, Fwo::Unknown);
        assert_eq!(tags.setoff, SetOff::Unknown);
        assert_eq!(tags.cond557c, Cond557c::NotApplicable);
        assert_eq!(tags.clause, Clause::Unknown);
        assert_eq!(tags.label, "");
    }

    #[test]
    fn test_judgement_without_fwo_pay_period() {
        let tags =
            extract("Judgement Based Clause 28.11 Apporach | Without FWO | Set-off: Pay Period");
        assert_eq!(tags.approach, Approach::JudgementBased);
        assert_eq!(tags.fwo, Fwo::WithoutFwo);
        assert_eq!(tags.setoff, SetOff::PayPeriod);
        assert_eq!(tags.cond557c, Cond557c::NotApplicable);
        assert_eq!(tags.clause, Clause::Clause2811);
        assert_eq!(
            tags.label,
            "Judgement Based Clause 28.11 Approach | Without FWO | Set-off: Pay Period"
        );
    }

    #[test]
    fn test_with_fwo_is_not_shadowed_by_without() {
        let tags = extract("Judgement Based Clause 28.11 Apporach | With FWO | Set-off: Bi Annual");
        assert_eq!(tags.fwo, Fwo::WithFwo);
        assert_eq!(tags.setoff, SetOff::BiAnnual);

        let tags = extract("Coles Based Clause 28.11 Approach |Without FWO | Set-off: Bi Annual");
        assert_eq!(tags.approach, Approach::ColesBased);
        assert_eq!(tags.fwo, Fwo::WithoutFwo);
        assert_eq!(tags.label, "Coles Based Clause 28.11 Approach | Without FWO | Set-off: Bi Annual");
    }

    #[test]
    fn test_557c_variants() {
        let tags = extract(
            "Judgement Based Clause 28.11 Apporach  | Set-off: Pay period | 557C condition on all shifts",
        );
        assert_eq!(tags.cond557c, Cond557c::AllShifts);
        assert_eq!(tags.setoff, SetOff::PayPeriod);
        assert_eq!(tags.fwo, Fwo::Unknown);

        let tags = extract(
            "Judgement Based Clause 28.11 Apporach | Set-off: Pay period | 557C condition on non-clocked shifts | After FWO",
        );
        assert_eq!(tags.fwo, Fwo::WithFwo);
        assert_eq!(tags.cond557c, Cond557c::NonClockedShifts);

        assert_eq!(extract("557C on non clocked shifts").cond557c, Cond557c::NonClockedShifts);
        assert_eq!(extract("557C condition").cond557c, Cond557c::Unspecified);
        assert_eq!(extract("all shifts, no condition").cond557c, Cond557c::NotApplicable);
    }

    #[test]
    fn test_setoff_capture_stops_at_pipe() {
        let tags = extract("Coles Based |Set-off: Annual | 557C condition on all shifts | After FWO");
        assert_eq!(tags.setoff, SetOff::Annual);
    }

    #[test]
    fn test_setoff_unrecognised_phrase_is_title_cased() {
        let tags = extract("Set-off: quarterly non-clocked | Without FWO");
        assert_eq!(tags.setoff, SetOff::Other("Quarterly Non-Clocked".to_string()));
        assert_eq!(tags.setoff.name(), "Quarterly Non-Clocked");
    }

    #[test]
    fn test_setoff_keyword_fallback() {
        assert_eq!(extract("Pay period set-off").setoff, SetOff::PayPeriod);
        assert_eq!(extract("annual set-off applied").setoff, SetOff::Annual);
        // keyword order: "annual" is checked before the bi-annual spellings
        assert_eq!(extract("bi-annual set-off").setoff, SetOff::Annual);
        assert_eq!(extract("set-off: | 28.11").setoff, SetOff::Unknown);
        assert_eq!(extract("Set-off: | pay period").setoff, SetOff::PayPeriod);
        assert_eq!(extract("Pay Period only").setoff, SetOff::Unknown);
    }

    #[test]
    fn test_setoff_substring_matching() {
        // a captured phrase is kept verbatim when it is not a known period
        assert_eq!(
            extract("Set-off: bi annually").setoff,
            SetOff::Other("Bi Annually".to_string())
        );
        // without a capture, "annual" inside "bi annually" wins the keyword scan
        assert_eq!(extract("bi annually set-off").setoff, SetOff::Annual);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Coles Based Clause 28.11 Apporach |Set-off: Annual | 557C condition on all shifts | After FWO";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_clean_label_is_idempotent() {
        let inputs = [
            "  Judgement Based Clause 28.11 Apporach  | Set-off: Pay period |557C condition on all shifts ",
            "a|b|  c",
            "| leading pipe",
            "",
        ];

        for input in inputs {
            let once = clean_label(input);
            assert_eq!(clean_label(&once), once, "Label not stable for: {:?}", input);
        }
        assert_eq!(clean_label("a|b|  c"), "a | b | c");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("pay period"), "Pay Period");
        assert_eq!(title_case("bi-annual"), "Bi-Annual");
        assert_eq!(title_case("ANNUAL"), "Annual");
    }

    #[test]
    fn test_tags_serialize_as_display_strings() {
        let tags = extract("Coles Based Clause 28.11 Approach | With FWO | Set-off: Bi Annual");
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json["approach"], "Coles Based");
        assert_eq!(json["fwo"], "With FWO");
        assert_eq!(json["setoff"], "Bi Annual");
        assert_eq!(json["cond_557c"], "N/A");
        assert_eq!(json["clause"], "28.11");
    }
}

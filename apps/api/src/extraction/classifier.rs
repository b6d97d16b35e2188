//! Section classifier: a line-oriented heuristic that splits raw resume text into
//! email, profile summary, skills, education and experience.
//!
//! Each line is run through an ordered list of `(predicate, bucket)` rules and
//! lands in the first bucket whose predicate matches. Keyword vocabularies are
//! plain data (`KeywordVocabulary`) so callers and tests can swap them.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Lines shorter than this are never classified.
const MIN_LINE_CHARS: usize = 5;
/// Unmatched lines longer than this are treated as descriptive profile text.
const FALLBACK_LINE_CHARS: usize = 50;
/// Skill fragments must be longer than this after splitting.
const MIN_SKILL_FRAGMENT_CHARS: usize = 2;
/// Entries of this length or shorter are dropped during cleanup.
const MIN_ENTRY_CHARS: usize = 3;

const SKILL_DELIMITERS: &[char] = &[',', '•', '-', ':'];

/// Structured fields produced by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub email: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: String,
}

/// Keyword sets per bucket. Matching is a case-insensitive substring test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordVocabulary {
    pub profile: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    /// Phrases stripped from the start of a skill fragment ("Skilled in React" -> "React").
    #[serde(default)]
    pub skill_lead_ins: Vec<String>,
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }

        Self {
            profile: words(&[
                "passionate",
                "collaborative",
                "problem",
                "user experience",
                "learning",
                "innovation",
                "creative",
                "summary",
                "objective",
            ]),
            skills: words(&[
                "react",
                "node",
                "express",
                "mongodb",
                "html",
                "css",
                "javascript",
                "firebase",
                "bootstrap",
                "git",
                "api",
                "frontend",
                "backend",
                "fullstack",
            ]),
            education: words(&[
                "bachelor",
                "intermediate",
                "matric",
                "school",
                "university",
                "quest",
                "grade",
                "education",
                "degree",
            ]),
            experience: words(&[
                "developer",
                "engineer",
                "intern",
                "technologies",
                "solutions",
                "company",
                "office",
                "maintained",
                "built",
                "collaborated",
                "debugged",
                "deployed",
                "experience",
                "worked",
            ]),
            skill_lead_ins: words(&[
                "skilled in",
                "proficient in",
                "experienced in",
                "experienced with",
                "familiar with",
                "knowledge of",
                "expertise in",
            ]),
        }
    }
}

/// Destination of a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    ProfileSummary,
    Skills,
    Education,
    Experience,
}

/// Pure predicate over a single trimmed line.
#[derive(Debug, Clone)]
pub enum LinePredicate {
    /// Lowercased line contains any of the (lowercased) keywords.
    ContainsAny(Vec<String>),
    /// Line is longer than the given number of characters.
    LongerThan(usize),
}

impl LinePredicate {
    fn contains_any(keywords: &[String]) -> Self {
        LinePredicate::ContainsAny(keywords.iter().map(|k| k.to_lowercase()).collect())
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            LinePredicate::ContainsAny(keywords) => {
                let lower = line.to_lowercase();
                keywords
                    .iter()
                    .any(|k| !k.is_empty() && lower.contains(k.as_str()))
            }
            LinePredicate::LongerThan(chars) => line.chars().count() > *chars,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub predicate: LinePredicate,
    pub bucket: Bucket,
}

#[derive(Debug, Clone)]
pub struct SectionClassifier {
    rules: Vec<ClassificationRule>,
    skill_lead_ins: Vec<String>,
}

impl Default for SectionClassifier {
    fn default() -> Self {
        Self::new(&KeywordVocabulary::default())
    }
}

impl SectionClassifier {
    /// Builds the standard rule order: profile, skills, education, experience,
    /// then the long-line fallback into profile summary.
    pub fn new(vocabulary: &KeywordVocabulary) -> Self {
        let rule = |predicate, bucket| ClassificationRule { predicate, bucket };
        let mut classifier = Self::with_rules(vec![
            rule(
                LinePredicate::contains_any(&vocabulary.profile),
                Bucket::ProfileSummary,
            ),
            rule(
                LinePredicate::contains_any(&vocabulary.skills),
                Bucket::Skills,
            ),
            rule(
                LinePredicate::contains_any(&vocabulary.education),
                Bucket::Education,
            ),
            rule(
                LinePredicate::contains_any(&vocabulary.experience),
                Bucket::Experience,
            ),
            rule(
                LinePredicate::LongerThan(FALLBACK_LINE_CHARS),
                Bucket::ProfileSummary,
            ),
        ]);
        classifier.skill_lead_ins = vocabulary
            .skill_lead_ins
            .iter()
            .map(|l| l.to_lowercase())
            .collect();
        classifier
    }

    /// A classifier over arbitrary rules, with no skill lead-ins.
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self {
            rules,
            skill_lead_ins: Vec::new(),
        }
    }

    /// Returns the bucket of the first matching rule, if any.
    pub fn bucket_for(&self, line: &str) -> Option<Bucket> {
        self.rules
            .iter()
            .find(|r| r.predicate.matches(line))
            .map(|r| r.bucket)
    }

    pub fn classify(&self, text: &str) -> ExtractionResult {
        let lines: Vec<&str> = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let email = lines
            .iter()
            .find_map(|line| EMAIL_RE.find(line))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let mut profile = Vec::new();
        let mut skills = Vec::new();
        let mut education = Vec::new();
        let mut experience = Vec::new();

        for line in lines {
            if line.chars().count() < MIN_LINE_CHARS {
                continue;
            }
            match self.bucket_for(line) {
                Some(Bucket::ProfileSummary) => profile.push(line.to_string()),
                Some(Bucket::Skills) => skills.extend(self.split_skill_line(line)),
                Some(Bucket::Education) => education.push(line.to_string()),
                Some(Bucket::Experience) => experience.push(line.to_string()),
                None => {}
            }
        }

        ExtractionResult {
            email,
            profile_summary: profile.join(" ").trim().to_string(),
            skills: clean_entries(skills),
            education: clean_entries(education),
            experience: clean_entries(experience).join(" "),
        }
    }

    fn split_skill_line<'a>(&'a self, line: &'a str) -> impl Iterator<Item = String> + 'a {
        line.split(SKILL_DELIMITERS)
            .map(|fragment| self.strip_lead_in(fragment.trim()))
            .filter(|s| s.chars().count() > MIN_SKILL_FRAGMENT_CHARS)
            .map(String::from)
    }

    fn strip_lead_in<'a>(&self, fragment: &'a str) -> &'a str {
        for lead_in in &self.skill_lead_ins {
            let Some(prefix) = fragment.get(..lead_in.len()) else {
                continue;
            };
            let rest = &fragment[lead_in.len()..];
            if prefix.eq_ignore_ascii_case(lead_in) && rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
        fragment
    }
}

/// Trims, drops entries of length <= 3 and removes exact duplicates,
/// keeping first occurrences in order.
pub fn clean_entries(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| e.chars().count() > MIN_ENTRY_CHARS)
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

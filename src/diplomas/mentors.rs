//! Per-mentor aggregation of the diploma listing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Diploma;

/// A mentor with every diploma they supervise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorSummary {
    pub mentor: String,
    pub total_diplomas: usize,
    pub diplomas: Vec<Diploma>,
}

/// A summary narrowed by a search. `diplomas` holds only the matching records,
/// `total_diplomas` still counts all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredMentorSummary {
    pub mentor: String,
    pub total_diplomas: usize,
    pub diplomas: Vec<Diploma>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Mentor,
    #[default]
    TotalDiplomas,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search and ordering applied to mentor summaries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorStats {
    pub total_mentors: usize,
    pub total_diplomas: usize,
    pub average: f64,
    pub median: f64,
    /// Diplomas whose status is at or past the defense.
    pub defended: usize,
}

/// Filtered mentor summaries plus stats over the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorReport {
    pub mentors: Vec<FilteredMentorSummary>,
    pub stats: MentorStats,
}

impl MentorReport {
    /// Aggregate, filter and sort. Stats ignore the search.
    pub fn build(diplomas: &[Diploma], query: &MentorQuery) -> Self {
        let summaries = aggregate_by_mentor(diplomas);
        Self {
            mentors: filter_and_sort(&summaries, query),
            stats: stats(diplomas, &summaries),
        }
    }
}

/// Group diplomas by trimmed mentor name, busiest mentors first.
///
/// Diplomas without a mentor are left out. Mentors with equal counts keep the
/// order in which they first appear in the listing.
pub fn aggregate_by_mentor(diplomas: &[Diploma]) -> Vec<MentorSummary> {
    let mut summaries: Vec<MentorSummary> = Vec::new();

    for diploma in diplomas {
        let mentor = diploma.mentor.trim();
        if mentor.is_empty() {
            continue;
        }
        match summaries.iter_mut().find(|s| s.mentor == mentor) {
            Some(summary) => summary.diplomas.push(diploma.clone()),
            None => summaries.push(MentorSummary {
                mentor: mentor.to_string(),
                total_diplomas: 0,
                diplomas: vec![diploma.clone()],
            }),
        }
    }

    for summary in &mut summaries {
        summary.total_diplomas = summary.diplomas.len();
    }
    summaries.sort_by(|a, b| b.total_diplomas.cmp(&a.total_diplomas));
    summaries
}

/// Apply a search and sort to aggregated summaries.
///
/// The search is case-insensitive. A mentor whose name matches keeps all of their
/// diplomas; otherwise only diplomas whose title or student matches are kept, and
/// mentors with none are dropped. Sorting by count uses the filtered count while a
/// search is active.
pub fn filter_and_sort(
    summaries: &[MentorSummary],
    query: &MentorQuery,
) -> Vec<FilteredMentorSummary> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut results: Vec<FilteredMentorSummary> = summaries
        .iter()
        .filter_map(|summary| {
            let diplomas = match &needle {
                None => summary.diplomas.clone(),
                Some(needle) if summary.mentor.to_lowercase().contains(needle) => {
                    summary.diplomas.clone()
                }
                Some(needle) => {
                    let matching: Vec<Diploma> = summary
                        .diplomas
                        .iter()
                        .filter(|d| {
                            d.title.to_lowercase().contains(needle)
                                || d.student.to_lowercase().contains(needle)
                        })
                        .cloned()
                        .collect();
                    if matching.is_empty() {
                        return None;
                    }
                    matching
                }
            };
            Some(FilteredMentorSummary {
                mentor: summary.mentor.clone(),
                total_diplomas: summary.total_diplomas,
                diplomas,
            })
        })
        .collect();

    let searching = needle.is_some();
    results.sort_by(|a, b| {
        let ordering = match query.sort {
            SortField::Mentor => compare_names(&a.mentor, &b.mentor),
            SortField::TotalDiplomas if searching => a.diplomas.len().cmp(&b.diplomas.len()),
            SortField::TotalDiplomas => a.total_diplomas.cmp(&b.total_diplomas),
        };
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    results
}

/// Lowercase Macedonian Cyrillic in alphabet order.
const MACEDONIAN_ALPHABET: &str = "абвгдѓежзѕијклљмнњопрстќуфхцчџш";

/// Collation weight of one character.
///
/// Macedonian letters take their alphabet position, placed just after Latin and
/// before the rest of Cyrillic. Anything else keeps its code point.
fn collation_key(c: char) -> u32 {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match MACEDONIAN_ALPHABET.chars().position(|m| m == lower) {
        Some(index) => 0x0400 + index as u32,
        None => lower as u32,
    }
}

/// Alphabetical, case-insensitive name order. Case breaks ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_key)
        .cmp(b.chars().map(collation_key))
        .then_with(|| a.cmp(b))
}

/// Totals, mean and median diplomas per mentor.
///
/// `total_diplomas` and `defended` count the whole listing, mentorless records
/// included. The median is over the per-mentor counts.
pub fn stats(diplomas: &[Diploma], summaries: &[MentorSummary]) -> MentorStats {
    let total_mentors = summaries.len();
    let total_diplomas = diplomas.len();

    let average = if total_mentors == 0 {
        0.0
    } else {
        total_diplomas as f64 / total_mentors as f64
    };

    let mut counts: Vec<usize> = summaries.iter().map(|s| s.total_diplomas).collect();
    counts.sort_unstable();
    let mid = counts.len() / 2;
    let median = match counts.len() {
        0 => 0.0,
        n if n % 2 == 0 => (counts[mid - 1] + counts[mid]) as f64 / 2.0,
        _ => counts[mid] as f64,
    };

    let defended = diplomas
        .iter()
        .filter(|d| status_stage(&d.status).is_some_and(|stage| stage >= DEFENDED_STAGE))
        .count();

    MentorStats {
        total_mentors,
        total_diplomas,
        average,
        median,
        defended,
    }
}

/// Workflow stages in the order a thesis moves through them.
const STATUS_STAGES: &[(&str, u8)] = &[
    ("пријава", 1),
    ("прифаќање", 2),
    ("валидирање од службата", 3),
    ("одобрение од продекан", 4),
    ("одобрение за оценка", 5),
    ("забелешки", 6),
    ("валидирање на услови", 7),
    ("одбран", 8),
    ("архив", 9),
];

/// Stage from which a thesis counts as defended.
pub const DEFENDED_STAGE: u8 = 8;

/// Map a free-text status onto its workflow stage (1..=9). First keyword match wins.
pub fn status_stage(status: &str) -> Option<u8> {
    let lower = status.to_lowercase();
    STATUS_STAGES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, stage)| stage)
}

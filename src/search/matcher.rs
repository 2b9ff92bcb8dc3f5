//! Client-side matching
//!
//! Case-insensitive substring matching over a category's fields, ranking,
//! and grouping into per-category result lists.

use serde::Serialize;

use crate::models::Record;
use crate::search::{QueryPlan, SearchCategory};

// == Highlight ==
/// A label split around its matched substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub field: String,
    pub before: String,
    pub matched: String,
    pub after: String,
}

// == Search Result ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub category: SearchCategory,
    pub item: Record,
    /// Fields that contain the needle, in the category's field order
    pub matched_fields: Vec<String>,
    /// Display label, from the category's label field
    pub label: String,
    /// First matched field split for highlighting
    pub highlight: Option<Highlight>,
}

impl SearchResult {
    /// Where activating this result leads.
    pub fn target(&self) -> SearchTarget {
        SearchTarget {
            category: self.category,
            id: self.item.id(),
        }
    }
}

/// Destination of an activated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTarget {
    pub category: SearchCategory,
    pub id: Option<String>,
}

impl SearchTarget {
    /// Route of the detail view, or of the listing when the record has no id.
    pub fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("/{}/{}", self.category.resource(), id),
            None => format!("/{}", self.category.resource()),
        }
    }
}

// == Result Group ==
/// Results of one category, capped to its slot count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultGroup {
    pub category: SearchCategory,
    pub title: String,
    /// Matches before capping
    pub total: usize,
    pub items: Vec<SearchResult>,
}

// == Slot Limits ==
/// How many results each group may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLimits {
    /// Slots per category when the query names none
    pub default: usize,
    /// Slots for the category the query names
    pub prioritized: usize,
    /// Slots for the other categories when one is named
    pub others: usize,
}

impl Default for SlotLimits {
    fn default() -> Self {
        Self {
            default: 5,
            prioritized: 8,
            others: 3,
        }
    }
}

impl SlotLimits {
    fn for_category(&self, category: SearchCategory, prioritized: Option<SearchCategory>) -> usize {
        match prioritized {
            None => self.default,
            Some(p) if p == category => self.prioritized,
            Some(_) => self.others,
        }
    }
}

// == Matching ==
/// Matches `record` against `needle` (already lowercased).
///
/// An empty needle matches nothing; see [`build_groups`] for the
/// keyword-only case.
pub fn match_record(category: SearchCategory, record: &Record, needle: &str) -> Option<SearchResult> {
    if needle.is_empty() {
        return None;
    }

    let mut matched_fields = Vec::new();
    let mut highlight = None;

    for field in category.fields() {
        let Some(text) = record.field(field) else {
            continue;
        };
        if let Some((start, end)) = find_case_insensitive(&text, needle) {
            matched_fields.push(field.to_string());
            highlight.get_or_insert_with(|| Highlight {
                field: field.to_string(),
                before: text[..start].to_string(),
                matched: text[start..end].to_string(),
                after: text[end..].to_string(),
            });
        }
    }

    if matched_fields.is_empty() {
        return None;
    }

    Some(SearchResult {
        category,
        label: label_of(category, record),
        item: record.clone(),
        matched_fields,
        highlight,
    })
}

/// Groups matches per category in display order, dropping empty groups.
///
/// The prioritized category comes first. When the needle is empty (the
/// query was only a category keyword) every record of the prioritized
/// category is listed.
pub fn build_groups(
    plan: &QueryPlan,
    sources: Vec<(SearchCategory, Vec<Record>)>,
    limits: &SlotLimits,
) -> Vec<ResultGroup> {
    let mut groups: Vec<ResultGroup> = sources
        .into_iter()
        .filter_map(|(category, records)| {
            let mut results: Vec<SearchResult> = if plan.needle.is_empty() {
                if plan.prioritized != Some(category) {
                    return None;
                }
                records
                    .iter()
                    .map(|record| SearchResult {
                        category,
                        label: label_of(category, record),
                        item: record.clone(),
                        matched_fields: Vec::new(),
                        highlight: None,
                    })
                    .collect()
            } else {
                records
                    .iter()
                    .filter_map(|record| match_record(category, record, &plan.needle))
                    .collect()
            };

            if results.is_empty() {
                return None;
            }

            rank(&mut results, &plan.needle);
            let total = results.len();
            results.truncate(limits.for_category(category, plan.prioritized));

            Some(ResultGroup {
                category,
                title: category.title().to_string(),
                total,
                items: results,
            })
        })
        .collect();

    groups.sort_by_key(|group| (plan.prioritized != Some(group.category), group.category));
    groups
}

/// Label prefix matches first, then label contains, then the rest;
/// alphabetical within each tier.
fn rank(results: &mut [SearchResult], needle: &str) {
    results.sort_by_cached_key(|result| {
        let label = result.label.to_lowercase();
        let tier = if needle.is_empty() || label.starts_with(needle) {
            0
        } else if label.contains(needle) {
            1
        } else {
            2
        };
        (tier, label)
    });
}

fn label_of(category: SearchCategory, record: &Record) -> String {
    record
        .field(category.label_field())
        .or_else(|| record.field("nome"))
        .or_else(|| record.id())
        .unwrap_or_default()
}

/// Byte range in `haystack` of the first case-insensitive occurrence of
/// `needle_lower`.
pub(crate) fn find_case_insensitive(haystack: &str, needle_lower: &str) -> Option<(usize, usize)> {
    if needle_lower.is_empty() {
        return Some((0, 0));
    }

    // Lowercasing may change byte lengths, so keep a map from each byte of
    // the lowered text back to the start of its source char.
    let mut lowered = String::with_capacity(haystack.len());
    let mut origin = Vec::with_capacity(haystack.len());

    for (idx, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            let before = lowered.len();
            lowered.push(lower);
            origin.resize(origin.len() + (lowered.len() - before), idx);
        }
    }

    let pos = lowered.find(needle_lower)?;
    let start = origin[pos];

    // A match may stop inside a multi-char expansion, e.g. "İ" -> "i\u{307}";
    // the whole source char is then part of the range.
    let last = origin[pos + needle_lower.len() - 1];
    let end = last + haystack[last..].chars().next().map_or(0, char::len_utf8);

    Some((start, end))
}

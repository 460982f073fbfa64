//! Generic list projection: filter, search, sort, paginate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Binary sort direction.
///
/// `Asc` is implemented by reversing the descending result vector, not by
/// inverting the comparator. With tied keys the two differ: reversal also
/// reverses insertion order among ties. Callers (and tests) rely on the
/// exact-reverse contract, so this must not be "fixed" into a stable
/// ascending sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

/// Persisted per-module sort preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPreference {
    pub key: String,
    pub order: SortOrder,
}

impl Default for SortPreference {
    fn default() -> Self {
        Self {
            key: "latest".to_string(),
            order: SortOrder::Desc,
        }
    }
}

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;
type Haystack<'a, T> = Box<dyn Fn(&T) -> Vec<String> + 'a>;

/// One module's view-model query: predicates, search, named comparator.
///
/// Filters combine with AND semantics. Search is case-insensitive substring
/// containment over the strings the haystack function yields; it is not
/// tokenized and not ranked.
pub struct ListQuery<'a, T> {
    filters: Vec<Predicate<'a, T>>,
    search_text: Option<String>,
    haystack: Option<Haystack<'a, T>>,
    comparator: Option<Comparator<'a, T>>,
    order: SortOrder,
}

impl<'a, T: Clone> ListQuery<'a, T> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            search_text: None,
            haystack: None,
            comparator: None,
            order: SortOrder::Desc,
        }
    }

    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Sets the search text and the fields it matches against.
    ///
    /// Blank search text matches everything.
    pub fn search(
        mut self,
        text: impl Into<String>,
        haystack: impl Fn(&T) -> Vec<String> + 'a,
    ) -> Self {
        self.search_text = Some(text.into());
        self.haystack = Some(Box::new(haystack));
        self
    }

    /// Sets the comparator defining the descending ("natural") order.
    pub fn sort_by(mut self, comparator: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Produces the displayed ordered subset.
    pub fn apply(&self, items: &[T]) -> Vec<T> {
        let needle = self
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        let mut out: Vec<T> = items
            .iter()
            .filter(|item| self.filters.iter().all(|predicate| predicate(item)))
            .filter(|item| match (&needle, &self.haystack) {
                (Some(needle), Some(haystack)) => haystack(item)
                    .iter()
                    .any(|field| field.to_lowercase().contains(needle.as_str())),
                _ => true,
            })
            .cloned()
            .collect();

        if let Some(comparator) = &self.comparator {
            out.sort_by(|a, b| comparator(a, b));
            if self.order == SortOrder::Asc {
                out.reverse();
            }
        }

        out
    }
}

impl<T: Clone> Default for ListQuery<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank table for relative-time display labels.
///
/// Display strings, not timestamps, drive recency ordering; every module
/// declares the labels its seed data uses, newest first. Labels missing from
/// the table rank lowest.
#[derive(Debug, Clone)]
pub struct RecencyRankTable {
    ranks: BTreeMap<String, i64>,
}

impl RecencyRankTable {
    /// Builds a table from labels ordered newest to oldest.
    pub fn from_labels(labels: &[&str]) -> Self {
        let ranks = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.to_string(), (labels.len() - index) as i64))
            .collect();
        Self { ranks }
    }

    pub fn rank(&self, label: &str) -> i64 {
        self.ranks.get(label).copied().unwrap_or(i64::MIN)
    }

    /// Descending comparator over two labels (newest first).
    pub fn compare_desc(&self, a: &str, b: &str) -> Ordering {
        self.rank(b).cmp(&self.rank(a))
    }
}

/// Popularity score: fixed weighted sum of engagement counters.
pub fn heat_score(views: u32, likes: u32, replies: u32) -> u64 {
    u64::from(views) + u64::from(likes) * 3 + u64::from(replies) * 5
}

/// In-memory pagination over an already-projected list. Pages are 1-based;
/// an out-of-range page yields an empty vector.
pub fn page<T: Clone>(items: &[T], page_no: usize, page_size: usize) -> Vec<T> {
    if page_no == 0 || page_size == 0 {
        return Vec::new();
    }
    items
        .iter()
        .skip((page_no - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect()
}

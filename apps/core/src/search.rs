use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::{Calculator, NormalizedText};
use crate::similarity::{best_alignment_within, DEFAULT_THRESHOLD};

pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Description,
    Keywords,
    CategoryTitle,
}

/// Per-field weights in `(0, 1]`. A weight of `1.0` keeps the raw score; lower
/// weights pull a field's score toward `1.0` so it can never beat an equally
/// good match in a heavier field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub keywords: f64,
    pub description: f64,
    pub category_title: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 1.0,
            keywords: 0.85,
            description: 0.6,
            category_title: 0.4,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Title => self.title,
            SearchField::Keywords => self.keywords,
            SearchField::Description => self.description,
            SearchField::CategoryTitle => self.category_title,
        }
    }

    pub fn apply(&self, field: SearchField, score: f64) -> f64 {
        1.0 - self.weight(field) * (1.0 - score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub max_results: usize,
    pub threshold: f64,
    pub weights: FieldWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            threshold: DEFAULT_THRESHOLD,
            weights: FieldWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRange {
    pub field: SearchField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_index: Option<usize>,
    pub start: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub calculator: Calculator,
    pub score: f64,
    pub matched_ranges: Vec<MatchRange>,
}

#[derive(Debug, Clone)]
struct IndexedText {
    field: SearchField,
    keyword_index: Option<usize>,
    text: NormalizedText,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    calculator: Calculator,
    texts: Vec<IndexedText>,
}

#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    options: SearchOptions,
}

impl SearchIndex {
    pub fn build(catalog: &Catalog, options: SearchOptions) -> Self {
        let entries: Vec<IndexEntry> = catalog
            .list_all_calculators()
            .into_iter()
            .map(|calculator| {
                let mut texts = vec![
                    indexed(SearchField::Title, None, &calculator.title),
                    indexed(SearchField::Description, None, &calculator.description),
                    indexed(SearchField::CategoryTitle, None, &calculator.category_title),
                ];
                texts.extend(
                    calculator
                        .keywords
                        .iter()
                        .enumerate()
                        .map(|(index, keyword)| indexed(SearchField::Keywords, Some(index), keyword)),
                );
                texts.retain(|entry| !entry.text.is_empty());

                IndexEntry {
                    calculator: calculator.clone(),
                    texts,
                }
            })
            .collect();

        tracing::debug!(entries = entries.len(), "search index built");
        Self { entries, options }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Ranked best-first (lowest score), ties kept in catalog order.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if self.options.max_results == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        let normalized_query = NormalizedText::new(query);
        if normalized_query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, usize, SearchResult)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                self.score_entry(entry, &normalized_query)
                    .map(|result| (result.score, position, result))
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        scored
            .into_iter()
            .take(self.options.max_results)
            .map(|(_, _, result)| result)
            .collect()
    }

    fn score_entry(&self, entry: &IndexEntry, query: &NormalizedText) -> Option<SearchResult> {
        let mut best: Option<f64> = None;
        let mut matched_ranges = Vec::new();

        for indexed in &entry.texts {
            let Some(sim) =
                best_alignment_within(query.chars(), indexed.text.chars(), self.options.threshold)
            else {
                continue;
            };

            let weighted = self.options.weights.apply(indexed.field, sim.score);
            best = Some(best.map_or(weighted, |current| current.min(weighted)));

            if let Some((start, length)) = indexed.text.source_span(sim.start, sim.end) {
                matched_ranges.push(MatchRange {
                    field: indexed.field,
                    keyword_index: indexed.keyword_index,
                    start,
                    length,
                });
            }
        }

        best.map(|score| SearchResult {
            calculator: entry.calculator.clone(),
            score,
            matched_ranges,
        })
    }
}

fn indexed(field: SearchField, keyword_index: Option<usize>, value: &str) -> IndexedText {
    IndexedText {
        field,
        keyword_index,
        text: NormalizedText::new(value),
    }
}

//! Paginated, searchable list of every term in the deck.
//!
//! The list always shows the full deck in deck order, regardless of the
//! starred-only filter of the card view. An optional query narrows it with the
//! Skim fuzzy matcher: a term match yields highlight ranges, a definition-only
//! match is listed without highlights.

use crate::domain::Flashcard;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One listed card with the character ranges of its term to highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry<'a> {
    pub card: &'a Flashcard,
    pub highlights: Vec<(usize, usize)>,
}

/// The visible page of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermListPage<'a> {
    pub entries: Vec<TermEntry<'a>>,
    /// Zero-based page actually shown, after clamping.
    pub page: usize,
    pub page_count: usize,
    /// Number of cards matching the query, across all pages.
    pub matched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermList {
    page: usize,
    page_size: usize,
    query: String,
}

impl Default for TermList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TermList {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            query: String::new(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the query and returns to the first page.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.page = 0;
    }

    fn page_count(&self, matched: usize) -> usize {
        matched.div_ceil(self.page_size).max(1)
    }

    fn matching<'a>(&self, deck: &'a [Flashcard]) -> Vec<TermEntry<'a>> {
        if self.query.is_empty() {
            return deck
                .iter()
                .map(|card| TermEntry {
                    card,
                    highlights: Vec::new(),
                })
                .collect();
        }

        let matcher = SkimMatcherV2::default();
        deck.iter()
            .filter_map(|card| {
                if let Some((_score, indices)) = matcher.fuzzy_indices(&card.term, &self.query) {
                    Some(TermEntry {
                        card,
                        highlights: highlight_ranges(&indices),
                    })
                } else {
                    matcher
                        .fuzzy_match(&card.definition, &self.query)
                        .map(|_| TermEntry {
                            card,
                            highlights: Vec::new(),
                        })
                }
            })
            .collect()
    }

    /// Computes the page to display. A page beyond the end (after the deck or
    /// the match set shrank) shows the last page instead.
    #[must_use]
    pub fn visible<'a>(&self, deck: &'a [Flashcard]) -> TermListPage<'a> {
        let matches = self.matching(deck);
        let matched = matches.len();
        let page_count = self.page_count(matched);
        let page = self.page.min(page_count - 1);

        let entries = matches
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        TermListPage {
            entries,
            page,
            page_count,
            matched,
        }
    }

    /// Moves to the next page if there is one.
    pub fn next_page(&mut self, deck: &[Flashcard]) -> bool {
        let page_count = self.page_count(self.matching(deck).len());
        let current = self.page.min(page_count - 1);
        if current + 1 < page_count {
            self.page = current + 1;
            true
        } else {
            self.page = current;
            false
        }
    }

    /// Moves to the previous page if there is one.
    pub fn prev_page(&mut self, deck: &[Flashcard]) -> bool {
        let page_count = self.page_count(self.matching(deck).len());
        let current = self.page.min(page_count - 1);
        self.page = current.saturating_sub(1);
        current > 0
    }
}

/// Coalesces sorted character indices into `(start, end)` ranges with an
/// exclusive end.
fn highlight_ranges(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

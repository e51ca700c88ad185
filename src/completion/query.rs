//! Candidate lists for interactive completion and the filter applied to them.

use crate::history::{CandidateList, Entry, FileStore, HistoryStore, HistoryType};

/// Anything completion candidates can be pushed into, e.g. a view's model.
pub trait CandidateSink {
    fn push(&mut self, entry: Entry);
}

impl CandidateSink for Vec<Entry> {
    fn push(&mut self, entry: Entry) {
        Vec::push(self, entry);
    }
}

/// Push every stored entry of `ty` into `sink`, most recent first.
///
/// Only URL and search history feed completion; other types push nothing.
/// Returns whether anything was pushed.
pub fn fill_candidates<S, K>(store: &HistoryStore<S>, ty: HistoryType, sink: &mut K) -> bool
where
    S: FileStore,
    K: CandidateSink + ?Sized,
{
    if !matches!(ty, HistoryType::Url | HistoryType::Search) {
        return false;
    }

    let mut found = false;
    for entry in store.load(ty).into_iter().rev() {
        sink.push(entry);
        found = true;
    }
    found
}

pub fn fill_url_completion<S: FileStore, K: CandidateSink + ?Sized>(
    store: &HistoryStore<S>,
    sink: &mut K,
) -> bool {
    fill_candidates(store, HistoryType::Url, sink)
}

pub fn fill_search_completion<S: FileStore, K: CandidateSink + ?Sized>(
    store: &HistoryStore<S>,
    sink: &mut K,
) -> bool {
    fill_candidates(store, HistoryType::Search, sink)
}

/// `fill_candidates` collected into a list.
pub fn candidates<S: FileStore>(store: &HistoryStore<S>, ty: HistoryType) -> CandidateList {
    let mut list = Vec::new();
    fill_candidates(store, ty, &mut list);
    list
}

/// Split raw completion input into the terms `matches` checks.
pub fn split_terms(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// True if every term occurs, ignoring case, in the entry's primary value or
/// its secondary label. No terms match everything.
pub fn matches<T: AsRef<str>>(entry: &Entry, terms: &[T]) -> bool {
    let primary = entry.primary.to_lowercase();
    let secondary = entry.secondary.as_deref().map(str::to_lowercase);

    terms.iter().all(|term| {
        let term = term.as_ref().to_lowercase();
        primary.contains(&term)
            || secondary
                .as_deref()
                .is_some_and(|secondary| secondary.contains(&term))
    })
}

/// The candidates visible for `input`, order kept.
pub fn filter<'a>(candidates: &'a [Entry], input: &str) -> Vec<&'a Entry> {
    let terms = split_terms(input);
    candidates
        .iter()
        .filter(|entry| matches(entry, terms.as_slice()))
        .collect()
}

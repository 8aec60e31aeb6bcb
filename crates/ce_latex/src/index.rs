//! Trigger index over the dictionary.
//!
//! Built once per dictionary and shared read-only between parsers, so it can
//! sit behind an `Arc` and be used from any thread.

use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::dictionary::{default_dictionary, EntryKind, LatexDictionaryEntry, LibraryCategory};
use crate::tokenizer::Token;

type Slots = SmallVec<[usize; 2]>;

static DEFAULT_INDEX: LazyLock<Arc<GrammarIndex>> = LazyLock::new(|| {
    Arc::new(GrammarIndex::new(
        default_dictionary(),
        &LibraryCategory::ALL,
    ))
});

#[derive(Debug)]
pub struct GrammarIndex {
    entries: Vec<LatexDictionaryEntry>,
    by_trigger: [FxHashMap<String, Slots>; EntryKind::COUNT],
    by_name: FxHashMap<String, Slots>,
    /// First token of each matchfix closer.
    closers: FxHashMap<String, Slots>,
    environments: FxHashMap<String, usize>,
    /// Longest trigger, in tokens.
    lookahead: usize,
}

impl GrammarIndex {
    /// Index the entries whose category is enabled. `Core` entries are
    /// always kept.
    pub fn new(entries: Vec<LatexDictionaryEntry>, categories: &[LibraryCategory]) -> Self {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| e.category == LibraryCategory::Core || categories.contains(&e.category))
            .collect();

        let mut by_trigger: [FxHashMap<String, Slots>; EntryKind::COUNT] = Default::default();
        let mut by_name: FxHashMap<String, Slots> = FxHashMap::default();
        let mut closers: FxHashMap<String, Slots> = FxHashMap::default();
        let mut environments = FxHashMap::default();
        let mut lookahead = 1;

        for (slot, entry) in entries.iter().enumerate() {
            if entry.kind == EntryKind::Environment {
                environments.entry(entry.trigger.join(" ")).or_insert(slot);
            } else {
                by_trigger[entry.kind.index()]
                    .entry(entry.trigger.join(" "))
                    .or_default()
                    .push(slot);
                lookahead = lookahead.max(entry.trigger.len());
            }
            if let Some(first) = entry.close.first() {
                closers.entry(first.clone()).or_default().push(slot);
            }
            by_name.entry(entry.name.clone()).or_default().push(slot);
        }

        debug!(entries = entries.len(), lookahead, "built grammar index");
        Self {
            entries,
            by_trigger,
            by_name,
            closers,
            environments,
            lookahead,
        }
    }

    /// The index over the full default dictionary.
    pub fn shared() -> Arc<GrammarIndex> {
        Arc::clone(&DEFAULT_INDEX)
    }

    pub fn entries(&self) -> &[LatexDictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `kind` whose trigger starts at `pos`, with the number of
    /// tokens (spaces included) each consumes.
    ///
    /// Longer triggers come first; among equal triggers, declaration order.
    pub fn lookup(
        &self,
        tokens: &[Token],
        pos: usize,
        kind: EntryKind,
    ) -> SmallVec<[(&LatexDictionaryEntry, usize); 4]> {
        let table = &self.by_trigger[kind.index()];
        let mut found = SmallVec::new();
        if table.is_empty() {
            return found;
        }
        let mut key = String::new();
        let mut cursor = pos;
        let mut prefixes: SmallVec<[(String, usize); 4]> = SmallVec::new();
        for _ in 0..self.lookahead {
            let Some(token) = tokens.get(cursor) else {
                break;
            };
            if !key.is_empty() {
                key.push(' ');
            }
            key.push_str(&token.text);
            cursor += 1;
            prefixes.push((key.clone(), cursor - pos));
            while tokens.get(cursor).is_some_and(Token::is_space) {
                cursor += 1;
            }
        }
        for (key, consumed) in prefixes.iter().rev() {
            if let Some(slots) = table.get(key) {
                found.extend(slots.iter().map(|&slot| (&self.entries[slot], *consumed)));
            }
        }
        found
    }

    /// Matchfix entry whose closing delimiter starts at `pos`.
    pub fn closing_delimiter(
        &self,
        tokens: &[Token],
        pos: usize,
    ) -> Option<(&LatexDictionaryEntry, usize)> {
        let first = tokens.get(pos)?;
        let slots = self.closers.get(&first.text)?;
        slots.iter().map(|&slot| &self.entries[slot]).find_map(|entry| {
            let mut cursor = pos;
            for part in &entry.close {
                while tokens.get(cursor).is_some_and(Token::is_space) {
                    cursor += 1;
                }
                if tokens.get(cursor)?.text != *part {
                    return None;
                }
                cursor += 1;
            }
            Some((entry, cursor - pos))
        })
    }

    pub fn environment(&self, name: &str) -> Option<&LatexDictionaryEntry> {
        self.environments.get(name).map(|&slot| &self.entries[slot])
    }

    /// First declared entry producing `name`, optionally of a given kind.
    pub fn by_name(&self, name: &str, kind: Option<EntryKind>) -> Option<&LatexDictionaryEntry> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&slot| &self.entries[slot])
            .find(|e| kind.map_or(true, |k| e.kind == k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn names(index: &GrammarIndex, src: &str, kind: EntryKind) -> Vec<(String, usize)> {
        let tokens = tokenize(src);
        index
            .lookup(&tokens, 0, kind)
            .into_iter()
            .map(|(e, n)| (e.name.clone(), n))
            .collect()
    }

    #[test]
    fn longest_trigger_wins() {
        let index = GrammarIndex::shared();
        let found = names(&index, "\\left( x", EntryKind::Matchfix);
        assert_eq!(found.first().map(|(n, c)| (n.as_str(), *c)), Some(("Delimiter", 2)));
    }

    #[test]
    fn spaces_between_trigger_tokens_are_skipped() {
        let index = GrammarIndex::shared();
        let found = names(&index, "\\left ( x", EntryKind::Matchfix);
        assert_eq!(found.first().map(|(_, c)| *c), Some(3));
    }

    #[test]
    fn categories_filter_entries() {
        let full = GrammarIndex::shared();
        let core = GrammarIndex::new(default_dictionary(), &[]);
        assert!(core.len() < full.len());
        assert!(names(&core, "\\sin", EntryKind::Function).is_empty());
        assert!(!names(&full, "\\sin", EntryKind::Function).is_empty());
        assert!(!names(&core, "(", EntryKind::Matchfix).is_empty());
    }

    #[test]
    fn closers_and_environments() {
        let index = GrammarIndex::shared();
        let tokens = tokenize("\\right)");
        let (entry, consumed) = index
            .closing_delimiter(&tokens, 0)
            .unwrap_or_else(|| panic!("no closer"));
        assert_eq!(entry.trigger_text(), "\\left(");
        assert_eq!(consumed, 2);
        assert_eq!(index.environment("pmatrix").map(|e| e.name.as_str()), Some("Matrix"));
        assert_eq!(
            index.by_name("Sin", Some(EntryKind::Function)).map(|e| e.trigger_text()),
            Some("\\sin".to_string())
        );
    }
}

//! The 33-bucket keyword table.
//!
//! Buckets `0..32` are addressed by `hash(keyword, 5)`; keywords that
//! collide share a bucket and are told apart by a linear scan. Bucket 32
//! holds the fallback rule set used when no keyword is recognised.

use eliza_slip::hash;
use eliza_types::Word;
use serde::Serialize;

use crate::rules::KeywordEntry;

pub const HASH_BITS: u32 = 5;
pub const FALLBACK_BUCKET: usize = 1 << HASH_BITS;
pub const BUCKET_COUNT: usize = FALLBACK_BUCKET + 1;

/// Stable handle on one entry of a [`KeywordTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleRef {
    pub bucket: usize,
    pub index: usize,
}

impl RuleRef {
    pub const FALLBACK: RuleRef = RuleRef {
        bucket: FALLBACK_BUCKET,
        index: 0,
    };

    pub fn is_fallback(&self) -> bool {
        self.bucket == FALLBACK_BUCKET
    }
}

#[derive(Debug, Clone)]
pub struct KeywordTable {
    buckets: Vec<Vec<KeywordEntry>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTable {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    pub fn bucket_of(keyword: &str) -> usize {
        hash(keyword, HASH_BITS)
    }

    /// Append an entry to its keyword's bucket
    pub fn insert(&mut self, entry: KeywordEntry) -> RuleRef {
        let bucket = Self::bucket_of(entry.keyword.as_str());
        let slot = &mut self.buckets[bucket];
        if slot.iter().any(|e| e.keyword == entry.keyword) {
            tracing::warn!(keyword = %entry.keyword, "duplicate keyword; the first entry wins");
        }
        slot.push(entry);
        RuleRef {
            bucket,
            index: slot.len() - 1,
        }
    }

    /// Install the fallback rule set, replacing any previous one
    pub fn set_fallback(&mut self, entry: KeywordEntry) {
        self.buckets[FALLBACK_BUCKET] = vec![entry];
    }

    /// Find the first entry whose keyword equals `word`
    pub fn locate(&self, word: &str) -> Option<RuleRef> {
        let bucket = Self::bucket_of(word);
        self.buckets[bucket]
            .iter()
            .position(|entry| entry.keyword == word)
            .map(|index| RuleRef { bucket, index })
    }

    pub fn lookup(&self, word: &str) -> Option<&KeywordEntry> {
        self.locate(word).and_then(|r| self.entry(r))
    }

    pub fn lookup_mut(&mut self, word: &str) -> Option<&mut KeywordEntry> {
        self.locate(word).and_then(|r| self.entry_mut(r))
    }

    pub fn fallback(&self) -> Option<&KeywordEntry> {
        self.entry(RuleRef::FALLBACK)
    }

    pub fn entry(&self, rule: RuleRef) -> Option<&KeywordEntry> {
        self.buckets.get(rule.bucket)?.get(rule.index)
    }

    pub fn entry_mut(&mut self, rule: RuleRef) -> Option<&mut KeywordEntry> {
        self.buckets.get_mut(rule.bucket)?.get_mut(rule.index)
    }

    /// Non-empty buckets in index order, entries in insertion order
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[KeywordEntry])> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(index, bucket)| (index, bucket.as_slice()))
    }

    /// Number of keyword entries, not counting the fallback
    pub fn len(&self) -> usize {
        self.buckets[..FALLBACK_BUCKET].iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every keyword in bucket order
    pub fn keywords(&self) -> impl Iterator<Item = &Word> {
        self.buckets[..FALLBACK_BUCKET]
            .iter()
            .flatten()
            .map(|entry| &entry.keyword)
    }
}

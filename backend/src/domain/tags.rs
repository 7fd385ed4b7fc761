//! Per-tag listing counts.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Number of listings carrying a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Order by count descending, then tag ascending.
pub fn sort_tag_counts(counts: &mut [TagCount]) {
    counts.sort_by(compare);
}

fn compare(a: &TagCount, b: &TagCount) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag))
}

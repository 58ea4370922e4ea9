//! Tag sets and tag reconciliation
//!
//! A resource's tags are compared against a desired set to decide which tags
//! to add and which to remove. The diff is computed once, applied as one
//! untag call followed by one tag call, and never stored.
//!
//! ## Rules
//!
//! | Situation | `state=present` | `state=absent` |
//! |-----------|-----------------|----------------|
//! | desired key missing or with another value | add | untouched |
//! | desired key with null value | untouched | remove if present |
//! | desired key with empty value | set to `""` | remove if present |
//! | desired key with equal value | untouched | remove |
//! | current key not desired, `purge_tags` | remove | remove |
//!
//! Keys under the reserved `aws:` prefix are never purged.

use crate::defaults::RESERVED_TAG_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tags as stored on a resource: unique key to value
pub type TagMap = BTreeMap<String, String>;

/// Tags as requested by the user; a `None` value matches any current value
pub type DesiredTags = BTreeMap<String, Option<String>>;

/// Whether the requested tags should be present on or absent from the resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagState {
    #[default]
    Present,
    Absent,
}

impl TagState {
    pub fn as_str(self) -> &'static str {
        match self {
            TagState::Present => "present",
            TagState::Absent => "absent",
        }
    }
}

impl fmt::Display for TagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(TagState::Present),
            "absent" => Ok(TagState::Absent),
            other => Err(format!("state must be 'present' or 'absent', got: {other}")),
        }
    }
}

/// Tags to add and tags to remove for one resource.
///
/// A key never appears in both maps. Removed tags carry the value they
/// currently have on the resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: TagMap,
    pub to_remove: TagMap,
}

impl TagDiff {
    /// True when applying the diff would not touch the resource
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Keys to pass to the untag call
    pub fn keys_to_remove(&self) -> Vec<String> {
        self.to_remove.keys().cloned().collect()
    }
}

/// Check whether a key is reserved by AWS
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_TAG_PREFIX)
}

/// Structural tag diff.
///
/// Returns the tags whose value must be set (missing, or set to another
/// value) and, when `purge` is true, the current keys that are not desired.
/// Desired keys with a `None` value never produce an addition.
pub fn compare_tags(current: &TagMap, desired: &DesiredTags, purge: bool) -> (TagMap, Vec<String>) {
    let to_unset: Vec<String> = if purge {
        current
            .keys()
            .filter(|key| !desired.contains_key(*key) && !is_reserved_key(key))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let to_set = desired
        .iter()
        .filter_map(|(key, value)| {
            let value = value.as_ref()?;
            (current.get(key) != Some(value)).then(|| (key.clone(), value.clone()))
        })
        .collect();

    (to_set, to_unset)
}

/// Compute the tags to add and remove to move `current` towards `desired`.
///
/// With `state=absent`, a desired key is removed when it exists and the
/// desired value is null, empty, or equal to the current value. A key whose
/// value does not match is left alone unless `purge` removes it.
pub fn reconcile(current: &TagMap, desired: &DesiredTags, state: TagState, purge: bool) -> TagDiff {
    let (structural_add, structural_remove) = compare_tags(current, desired, purge);

    let mut to_remove = TagMap::new();

    if state == TagState::Absent {
        for (key, wanted) in desired {
            let Some(have) = current.get(key) else {
                continue;
            };
            let matches = match wanted {
                None => true,
                Some(value) => value.is_empty() || value == have,
            };
            if matches {
                to_remove.insert(key.clone(), have.clone());
            }
        }
    }

    for key in structural_remove {
        if let Some(have) = current.get(&key) {
            to_remove.insert(key, have.clone());
        }
    }

    let to_add = match state {
        TagState::Present => structural_add,
        TagState::Absent => TagMap::new(),
    };

    TagDiff { to_add, to_remove }
}

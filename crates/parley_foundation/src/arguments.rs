//! Keyword-tagged entity arguments.
//!
//! An [`Arguments`] value binds argument keywords (`subj`, `obj`, `dest`, ...)
//! to ordered entity sequences. It is immutable once built: the builder
//! methods consume `self`, and there is no in-place mutation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::SharedMap;
use crate::entity::EntityId;

/// Ordered mapping from keyword to entity sequence.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arguments(SharedMap<String, Vec<EntityId>>);

impl Arguments {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a binding with `keyword` bound to `entities`.
    ///
    /// Binding a keyword twice keeps the later sequence.
    #[must_use]
    pub fn with(self, keyword: impl Into<String>, entities: impl IntoIterator<Item = EntityId>) -> Self {
        Self(self.0.insert(keyword.into(), entities.into_iter().collect()))
    }

    /// Returns the entities bound to `keyword`.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&[EntityId]> {
        self.0.get(keyword).map(Vec::as_slice)
    }

    /// Returns true if `keyword` is bound.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains_key(keyword)
    }

    /// Number of bound keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no keyword is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bound keywords in sorted order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Bindings in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EntityId])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every entity mentioned, in keyword order then position.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.values().flat_map(|v| v.iter().copied())
    }

    /// Returns true if every binding in `partial` is present here with a
    /// positionally equal entity sequence. Keywords absent from `partial`
    /// are unconstrained.
    #[must_use]
    pub fn satisfies(&self, partial: &Arguments) -> bool {
        partial.iter().all(|(keyword, wanted)| {
            self.get(keyword)
                .is_some_and(|bound| EntityId::same_entities(bound, wanted))
        })
    }

    /// Returns a copy with every entity passed through `f`.
    #[must_use]
    pub fn map_entities(&self, mut f: impl FnMut(EntityId) -> EntityId) -> Self {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().map(|&e| f(e)).collect()))
            .collect::<SharedMap<_, _>>()
            .into()
    }
}

impl From<SharedMap<String, Vec<EntityId>>> for Arguments {
    fn from(map: SharedMap<String, Vec<EntityId>>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<EntityId>)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Vec<EntityId>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arguments({self})")
    }
}

/// Renders as `dest=[e2], subj=[e1]`.
impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (keyword, entities)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{keyword}=[")?;
            for (j, e) in entities.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{e}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// Index into an arrangement's phrase list.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PhraseId(pub usize);

/// Index into an arrangement's chord template list.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChordId(pub usize);

macro_rules! index_ops {
    ($id:ident) => {
        impl $id {
            pub fn index(self) -> usize {
                self.0
            }

            /// Shift the id by the size of the list it is appended after.
            pub fn offset(self, by: usize) -> Self {
                Self(self.0 + by)
            }

            /// Rewrite the id after the entry at `removed` was dropped and
            /// merged into `replacement` (a lower index).
            pub fn remap_removed(self, removed: $id, replacement: $id) -> Self {
                if self == removed {
                    replacement
                } else if self > removed {
                    Self(self.0 - 1)
                } else {
                    self
                }
            }
        }

        impl std::fmt::Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_ops!(PhraseId);
index_ops!(ChordId);

impl PhraseId {
    /// Rewrite the id after the entry at `removed` was dropped outright.
    ///
    /// Ids equal to `removed` are left dangling and must be retargeted by
    /// the caller.
    pub fn shift_down_past(self, removed: PhraseId) -> Self {
        if self > removed { Self(self.0 - 1) } else { self }
    }
}

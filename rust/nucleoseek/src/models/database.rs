use crate::errors::DatabaseError;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

/// Reference data for one RNA modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModificationEntry {
    pub name: String,
    /// Expected [M+H]+ of the modified nucleoside.
    pub reference_mass: f64,
    /// Product ions expected upon fragmentation, in database order.
    pub reference_product_ions: Vec<f64>,
}

impl ModificationEntry {
    pub fn new(
        name: impl Into<String>,
        reference_mass: f64,
        reference_product_ions: impl Into<Vec<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            reference_mass,
            reference_product_ions: reference_product_ions.into(),
        }
    }

    pub fn num_product_ions(&self) -> usize {
        self.reference_product_ions.len()
    }
}

/// What to do when merged databases define the same modification.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the entry seen first, warn if the later one differs.
    #[default]
    #[serde(rename = "keep_first")]
    KeepFirst,
    /// Any repeated name is an error.
    #[serde(rename = "strict")]
    Strict,
}

/// Name-indexed collection of modifications.
///
/// Lookups by name are O(1) and iteration follows insertion order, which
/// keeps candidate generation deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationDatabase {
    entries: IndexMap<String, ModificationEntry>,
}

impl ModificationDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, rejecting names that are already present.
    pub fn insert(&mut self, entry: ModificationEntry) -> Result<(), DatabaseError> {
        match self.entries.entry(entry.name.clone()) {
            Entry::Occupied(_) => Err(DatabaseError::DuplicateModification { name: entry.name }),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Folds `other` into `self`, returning how many entries were added.
    pub fn merge(
        &mut self,
        other: ModificationDatabase,
        policy: MergePolicy,
    ) -> Result<usize, DatabaseError> {
        let mut added = 0;
        for (name, entry) in other.entries {
            match self.entries.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                    added += 1;
                }
                Entry::Occupied(existing) => match policy {
                    MergePolicy::Strict => {
                        return Err(DatabaseError::DuplicateModification { name: entry.name });
                    }
                    MergePolicy::KeepFirst => {
                        if existing.get() == &entry {
                            debug!("Modification {} present in several databases", entry.name);
                        } else {
                            warn!(
                                "Conflicting definitions for modification {}, \
                                 keeping {:?} over {:?}",
                                entry.name,
                                existing.get(),
                                entry
                            );
                        }
                    }
                },
            }
        }
        Ok(added)
    }

    pub fn get(&self, name: &str) -> Option<&ModificationEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ModificationEntry> {
        self.entries.values()
    }
}

impl TryFrom<Vec<ModificationEntry>> for ModificationDatabase {
    type Error = DatabaseError;

    fn try_from(entries: Vec<ModificationEntry>) -> Result<Self, Self::Error> {
        let mut db = ModificationDatabase::new();
        for entry in entries {
            db.insert(entry)?;
        }
        Ok(db)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, BTreeMap, HashMap};

use crate::error::LedgerError;

/// Parent wallet -> child wallets whose transactions are reported under the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletMapping(BTreeMap<String, Vec<String>>);

impl WalletMapping {
    pub fn new(mapping: BTreeMap<String, Vec<String>>) -> Self {
        Self(mapping)
    }

    pub fn parents(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(parent, children)| (parent.as_str(), children.as_slice()))
    }

    pub fn children(&self, parent: &str) -> Option<&[String]> {
        self.0.get(parent).map(Vec::as_slice)
    }

    pub fn is_parent(&self, wallet: &str) -> bool {
        self.0.contains_key(wallet)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inverts the mapping into child -> parent.
    ///
    /// Fails if a child is listed under more than one parent, or if a parent is
    /// itself a child. Remapping is a single pass, so chains would depend on
    /// iteration order.
    pub fn reverse(&self) -> Result<HashMap<String, String>, LedgerError> {
        let mut reverse: HashMap<String, String> = HashMap::new();
        for (parent, children) in &self.0 {
            for child in children {
                match reverse.entry(child.clone()) {
                    Entry::Occupied(existing) if existing.get() != parent => {
                        let mut parents = vec![existing.get().clone(), parent.clone()];
                        parents.sort();
                        return Err(LedgerError::AmbiguousWalletMapping {
                            child: child.clone(),
                            parents,
                        });
                    }
                    Entry::Occupied(_) => {}
                    Entry::Vacant(entry) => {
                        entry.insert(parent.clone());
                    }
                }
            }
        }
        for parent in self.0.keys() {
            if let Some(grandparent) = reverse.get(parent) {
                return Err(LedgerError::NestedWalletMapping {
                    wallet: parent.clone(),
                    parent: grandparent.clone(),
                });
            }
        }
        Ok(reverse)
    }
}

impl<P, C> FromIterator<(P, C)> for WalletMapping
where
    P: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(parent, children)| {
                    (parent.into(), children.into_iter().map(Into::into).collect())
                })
                .collect(),
        )
    }
}

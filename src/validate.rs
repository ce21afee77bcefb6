use crate::{AliasMap, Error, Result};
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

impl<A, V, S> AliasMap<A, V, S>
where
    A: Eq + Hash,
    S: BuildHasher,
{
    /// Check that the resolution table and the groups agree with each
    /// other.  This walks every alias of every group, so it is meant
    /// for tests and debug assertions rather than hot paths.
    pub fn validate(&self) -> Result<()> {
        let next = self.groups.next_id();
        let mut listed = 0;

        for (slot, group) in self.groups.iter() {
            if slot >= next {
                return Err(Error::StaleSlot { slot, next });
            }
            if group.aliases.is_empty() {
                return Err(Error::EmptyGroup { slot });
            }

            let mut seen = HashSet::with_capacity(group.aliases.len());
            for alias in &group.aliases {
                if !seen.insert(alias) {
                    return Err(Error::DuplicateAlias { slot });
                }
                match self.resolution.get(alias) {
                    None => return Err(Error::UnregisteredAlias { slot }),
                    Some(&resolved) if resolved != slot => {
                        return Err(Error::MisroutedAlias { slot, resolved })
                    }
                    Some(_) => {}
                }
            }
            listed += group.aliases.len();
        }

        for &slot in self.resolution.values() {
            if !self.groups.contains(slot) {
                return Err(Error::DanglingAlias { slot });
            }
        }

        // Each listed alias was matched to its own registration above,
        // so equal counts leave no registration unlisted.
        if listed != self.resolution.len() {
            return Err(Error::AliasCountMismatch {
                registered: self.resolution.len(),
                listed,
            });
        }

        Ok(())
    }
}

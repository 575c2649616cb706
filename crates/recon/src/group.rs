use std::collections::HashMap;

use serde::Serialize;

use crate::matcher::NameMatcher;
use crate::signature::SignatureIndex;

/// Names of one source judged to denote the same customer. The key is the
/// first member as it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: String,
    pub members: Vec<String>,
}

impl Group {
    /// Name used when comparing this group against another source.
    pub fn representative(&self) -> &str {
        &self.key
    }
}

/// Groups of one source in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceGroups {
    groups: Vec<Group>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl SourceGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.positions.get(key).map(|&pos| &self.groups[pos])
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn at(&self, position: usize) -> &Group {
        &self.groups[position]
    }

    /// Appends `name` to the group keyed `key`, creating it if absent.
    /// Returns the group's position.
    pub fn push(&mut self, key: &str, name: &str) -> usize {
        match self.positions.get(key) {
            Some(&pos) => {
                self.groups[pos].members.push(name.to_string());
                pos
            }
            None => {
                let pos = self.groups.len();
                self.groups.push(Group {
                    key: key.to_string(),
                    members: vec![name.to_string()],
                });
                self.positions.insert(key.to_string(), pos);
                pos
            }
        }
    }

    /// Groups accepted by `keep`, in the same order.
    pub fn filtered(&self, mut keep: impl FnMut(&Group) -> bool) -> SourceGroups {
        let mut out = SourceGroups::new();
        for group in self.groups.iter().filter(|g| keep(g)) {
            out.positions.insert(group.key.clone(), out.groups.len());
            out.groups.push(group.clone());
        }
        out
    }

    pub fn into_vec(self) -> Vec<Group> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a SourceGroups {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl NameMatcher {
    /// Clusters the names of one source in arrival order. Each name joins
    /// the first earlier group that shares a signature and whose key it
    /// matches; otherwise it opens a new group. Blank names are skipped.
    pub fn group_within_source<S: AsRef<str>>(&self, names: &[S]) -> SourceGroups {
        let mut groups = SourceGroups::new();
        let mut index = SignatureIndex::new();

        for name in names.iter().map(AsRef::as_ref) {
            if name.trim().is_empty() {
                continue;
            }
            let sigs = self.signatures(name);

            let joined = index
                .candidates(&sigs)
                .into_iter()
                .find(|&pos| self.names_match(name, groups.at(pos).representative()));

            let pos = match joined {
                Some(pos) => {
                    let key = groups.at(pos).key.clone();
                    groups.push(&key, name)
                }
                None => {
                    let pos = groups.push(name, name);
                    if groups.at(pos).members.len() == 1 {
                        log::debug!("new group '{name}' ({} signatures)", sigs.len());
                    }
                    pos
                }
            };
            index.insert_all(&sigs, pos);
        }

        log::info!(
            "grouped {} names into {} groups",
            groups.iter().map(|g| g.members.len()).sum::<usize>(),
            groups.len()
        );
        groups
    }
}

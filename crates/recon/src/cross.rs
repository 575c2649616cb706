use std::collections::HashSet;

use serde::Serialize;

use crate::group::{Group, SourceGroups};
use crate::matcher::NameMatcher;
use crate::signature::SignatureIndex;

/// One group of the left source and the right group paired with it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossMatch {
    pub left: Group,
    pub right: Option<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossMatchOutput {
    /// Every left group, in the left source's order.
    pub matches: Vec<CrossMatch>,
    /// Keys of right groups paired with some left group.
    pub consumed_right: Vec<String>,
    /// Keys of right groups left unpaired, in the right source's order.
    pub unmatched_right: Vec<String>,
}

impl CrossMatchOutput {
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.right.is_some()).count()
    }
}

impl NameMatcher {
    /// Greedy one-to-one pairing of `left` groups with `right` groups by
    /// their representatives. Left groups are visited in order and take the
    /// first unconsumed signature candidate that matches.
    pub fn match_groups(&self, left: &SourceGroups, right: &SourceGroups) -> CrossMatchOutput {
        let mut index = SignatureIndex::new();
        for (pos, group) in right.iter().enumerate() {
            index.insert_all(&self.signatures(group.representative()), pos);
        }

        let mut consumed: HashSet<usize> = HashSet::new();
        let mut consumed_right = Vec::new();
        let mut matches = Vec::with_capacity(left.len());

        for group in left {
            let rep = group.representative();
            let found = index
                .candidates(&self.signatures(rep))
                .into_iter()
                .filter(|pos| !consumed.contains(pos))
                .find(|&pos| self.names_match(rep, right.at(pos).representative()));

            let paired = found.map(|pos| {
                consumed.insert(pos);
                let other = right.at(pos);
                log::debug!("paired '{}' with '{}'", group.key, other.key);
                consumed_right.push(other.key.clone());
                other.clone()
            });
            matches.push(CrossMatch {
                left: group.clone(),
                right: paired,
            });
        }

        let unmatched_right = right
            .iter()
            .enumerate()
            .filter(|(pos, _)| !consumed.contains(pos))
            .map(|(_, g)| g.key.clone())
            .collect();

        CrossMatchOutput {
            matches,
            consumed_right,
            unmatched_right,
        }
    }
}

//! Stable key grouping.

use std::hash::Hash;

use indexmap::IndexMap;

/// Records grouped by key.
///
/// Groups are ordered by the first appearance of their key, and records keep
/// their original order and position within each group.
#[derive(Debug, Clone)]
pub struct Groups<'a, K, T> {
    groups: IndexMap<K, Vec<(usize, &'a T)>>,
}

impl<'a, K, T> Groups<'a, K, T>
where
    K: Hash + Eq,
{
    pub fn build<F>(rows: &'a [T], key: F) -> Self
    where
        F: Fn(&T) -> K,
    {
        let mut groups: IndexMap<K, Vec<(usize, &'a T)>> = IndexMap::new();
        for (index, row) in rows.iter().enumerate() {
            groups.entry(key(row)).or_default().push((index, row));
        }
        Self { groups }
    }

    pub fn get(&self, key: &K) -> Option<&[(usize, &'a T)]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[(usize, &'a T)])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_first_seen_order() {
        let rows = [(3, "a"), (1, "b"), (3, "c"), (2, "d"), (1, "e")];
        let groups = Groups::build(&rows, |r| r.0);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn records_keep_order_and_position() {
        let rows = [(3, "a"), (1, "b"), (3, "c"), (3, "d")];
        let groups = Groups::build(&rows, |r| r.0);
        let three: Vec<_> = groups
            .get(&3)
            .unwrap()
            .iter()
            .map(|(i, r)| (*i, r.1))
            .collect();
        assert_eq!(three, vec![(0, "a"), (2, "c"), (3, "d")]);
        assert!(groups.get(&7).is_none());
    }

    #[test]
    fn empty_input() {
        let rows: [(i32, &str); 0] = [];
        let groups = Groups::build(&rows, |r| r.0);
        assert!(groups.is_empty());
    }
}

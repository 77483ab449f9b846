//! Order-preserving grouping.

use std::collections::HashMap;
use std::hash::Hash;

/// Group `items` by `key`, keeping groups in first-seen order and members in
/// their original relative order.
pub fn group_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, mut key: F) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

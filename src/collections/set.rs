/*
    A deduplicating set backed by a chained hash table.

    Membership is decided by the element type itself through `SetElement`,
    which lets a type pick which of its fields count (a production only
    compares its left-hand side, for instance). Elements that lose a
    membership check are dropped, so the set is the single owner of
    everything it holds.
*/

use std::fmt::{self, Debug, Display};

use itertools::Itertools;
use log::trace;

use super::ContainerError;

pub const INITIAL_BUCKET_COUNT: usize = 100;

/// Hashing and equality used by `HashingSet` to decide membership.
///
/// Two elements that are `element_eq` must have the same `element_hash`.
pub trait SetElement {
    fn element_hash(&self) -> u32;
    fn element_eq(&self, other: &Self) -> bool;
}

struct Slot<T> {
    hash: u32,
    element: T,
}

pub struct HashingSet<T> {
    buckets: Vec<Vec<Slot<T>>>,
    count: usize,
}

fn empty_buckets<T>(bucket_count: usize) -> Vec<Vec<Slot<T>>> {
    (0..bucket_count).map(|_| Vec::new()).collect()
}

impl<T: SetElement> HashingSet<T> {
    pub fn new() -> Self {
        HashingSet {
            buckets: empty_buckets(INITIAL_BUCKET_COUNT),
            count: 0,
        }
    }

    pub fn with_bucket_count(bucket_count: usize) -> Result<Self, ContainerError> {
        if bucket_count == 0 {
            return Err(ContainerError::InvalidArgument("a set needs at least one bucket"));
        }

        Ok(HashingSet {
            buckets: empty_buckets(bucket_count),
            count: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    // (bucket, chain position) of the stored element equal to `key`
    fn position(&self, hash: u32, key: &T) -> Option<(usize, usize)> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .position(|slot| slot.hash == hash && slot.element.element_eq(key))
            .map(|position| (bucket, position))
    }

    /// Inserts `element` unless an equal one is already stored, in which case
    /// `element` is dropped. Returns whether the element was inserted.
    pub fn add(&mut self, element: T) -> bool {
        let hash = element.element_hash();
        if self.position(hash, &element).is_some() {
            return false;
        }

        if self.count >= self.buckets.len() {
            self.grow();
        }

        let bucket = self.bucket_index(hash);
        self.buckets[bucket].push(Slot { hash, element });
        self.count += 1;

        return true;
    }

    // Doubles the bucket array; slots keep their relative chain order
    fn grow(&mut self) {
        let bucket_count = self.buckets.len() * 2;
        trace!("growing set from {} to {} buckets", self.buckets.len(), bucket_count);

        let old = std::mem::replace(&mut self.buckets, empty_buckets(bucket_count));
        for slot in old.into_iter().flatten() {
            let bucket = self.bucket_index(slot.hash);
            self.buckets[bucket].push(slot);
        }
    }

    /// Returns the stored element equal to `key`, not `key` itself.
    pub fn find(&self, key: &T) -> Option<&T> {
        let (bucket, position) = self.position(key.element_hash(), key)?;
        Some(&self.buckets[bucket][position].element)
    }

    /// Mutable access to the stored element equal to `key`. Callers must
    /// not change anything that takes part in `element_hash`.
    pub fn find_mut(&mut self, key: &T) -> Option<&mut T> {
        let (bucket, position) = self.position(key.element_hash(), key)?;
        Some(&mut self.buckets[bucket][position].element)
    }

    pub fn has(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Unlinks and drops the stored element equal to `key`.
    pub fn remove(&mut self, key: &T) -> bool {
        match self.position(key.element_hash(), key) {
            Some((bucket, position)) => {
                self.buckets[bucket].remove(position);
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        for chain in &mut self.buckets {
            chain.retain(|slot| keep(&slot.element));
        }
        self.count = self.buckets.iter().map(Vec::len).sum();
    }

    /// Moves every element of `src` into this set. Elements of `src` that are
    /// already present here are dropped.
    pub fn union(&mut self, src: HashingSet<T>) {
        for element in src {
            self.add(element);
        }
    }

    /// Keeps only the elements that are also in `filter`, consuming it.
    pub fn intersection(&mut self, filter: HashingSet<T>) {
        self.retain(|element| filter.has(element));
    }

    /// Drops the elements that are also in `subtrahend`.
    pub fn subtraction(&mut self, subtrahend: &HashingSet<T>) {
        self.retain(|element| !subtrahend.has(element));
    }
}

impl<T> HashingSet<T> {
    /// Visits every element in ascending bucket order, and in insertion
    /// order within a bucket.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buckets: &self.buckets,
            bucket: 0,
            position: 0,
        }
    }
}

impl<T: SetElement> Default for HashingSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    buckets: &'a [Vec<Slot<T>>],
    bucket: usize,
    position: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let buckets = self.buckets;
        while let Some(chain) = buckets.get(self.bucket) {
            if let Some(slot) = chain.get(self.position) {
                self.position += 1;
                return Some(&slot.element);
            }
            self.bucket += 1;
            self.position = 0;
        }
        None
    }
}

pub struct IntoIter<T> {
    slots: std::iter::Flatten<std::vec::IntoIter<Vec<Slot<T>>>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.slots.next().map(|slot| slot.element)
    }
}

impl<T> IntoIterator for HashingSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            slots: self.buckets.into_iter().flatten(),
        }
    }
}

impl<'a, T> IntoIterator for &'a HashingSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: SetElement> Extend<T> for HashingSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<T: SetElement> FromIterator<T> for HashingSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashingSet::new();
        set.extend(iter);
        set
    }
}

// `{:#}` is forwarded to the elements
impl<T: Display> Display for HashingSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{{}}");
        }

        let alternate = f.alternate();
        let elements = self
            .iter()
            .map(|element| {
                if alternate {
                    format!("{:#}", element)
                } else {
                    element.to_string()
                }
            })
            .join(", ");
        write!(f, "{{ {} }}", elements)
    }
}

impl<T: Debug> Debug for HashingSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    // Hashes to its own value, which makes bucket placement predictable
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Number(u32);

    impl SetElement for Number {
        fn element_hash(&self) -> u32 {
            self.0
        }

        fn element_eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Display for Number {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    // Only `key` takes part in membership, every value collides
    #[derive(Debug)]
    struct Tagged {
        key: &'static str,
        tag: u32,
    }

    impl SetElement for Tagged {
        fn element_hash(&self) -> u32 {
            7
        }

        fn element_eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    fn numbers(values: &[u32]) -> HashingSet<Number> {
        values.iter().map(|&v| Number(v)).collect()
    }

    fn sorted(set: &HashingSet<Number>) -> Vec<u32> {
        set.iter().map(|n| n.0).sorted().collect()
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut set = HashingSet::new();
        assert!(set.add(Tagged { key: "a", tag: 1 }));
        assert!(!set.add(Tagged { key: "a", tag: 2 }));

        assert_eq!(set.len(), 1);
        let stored = set.find(&Tagged { key: "a", tag: 3 }).unwrap();
        assert_eq!(stored.tag, 1);
    }

    #[test]
    fn find_mut_reaches_stored_element() {
        let mut set = HashingSet::new();
        set.add(Tagged { key: "a", tag: 1 });
        set.add(Tagged { key: "b", tag: 2 });

        set.find_mut(&Tagged { key: "b", tag: 0 }).unwrap().tag = 20;

        assert_eq!(set.find(&Tagged { key: "b", tag: 0 }).unwrap().tag, 20);
        assert!(set.find_mut(&Tagged { key: "c", tag: 0 }).is_none());
    }

    #[test]
    fn remove_from_middle_of_chain() {
        let mut set = HashingSet::new();
        for (key, tag) in [("a", 1), ("b", 2), ("c", 3)] {
            set.add(Tagged { key, tag });
        }

        assert!(set.remove(&Tagged { key: "b", tag: 0 }));
        assert!(!set.remove(&Tagged { key: "b", tag: 0 }));

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().map(|t| t.key).collect_vec(), vec!["a", "c"]);
    }

    #[test]
    fn set_algebra() {
        let mut union = numbers(&[1, 2, 3]);
        union.union(numbers(&[2, 3, 4]));
        assert_eq!(sorted(&union), vec![1, 2, 3, 4]);
        assert_eq!(union.len(), 4);

        let mut intersection = numbers(&[1, 2, 3]);
        intersection.intersection(numbers(&[2, 3, 4]));
        assert_eq!(sorted(&intersection), vec![2, 3]);
        assert_eq!(intersection.len(), 2);

        let mut subtraction = numbers(&[1, 2, 3]);
        let subtrahend = numbers(&[2, 3, 4]);
        subtraction.subtraction(&subtrahend);
        assert_eq!(sorted(&subtraction), vec![1]);
        assert_eq!(sorted(&subtrahend), vec![2, 3, 4]);
    }

    #[test]
    fn iterates_in_bucket_order() {
        let set = numbers(&[5, 1, 3, 101]);
        // 101 shares bucket 1 with 1 and comes after it in the chain
        assert_eq!(set.iter().map(|n| n.0).collect_vec(), vec![1, 101, 3, 5]);
    }

    #[test]
    fn grows_past_initial_buckets() {
        let set: HashingSet<Number> = (0..250).map(Number).collect();

        assert_eq!(set.len(), 250);
        assert!(set.bucket_count() >= 250);
        assert!((0..250).all(|v| set.has(&Number(v))));
        assert!(!set.has(&Number(250)));
    }

    #[test]
    fn zero_buckets_is_invalid() {
        assert_eq!(
            HashingSet::<Number>::with_bucket_count(0).err(),
            Some(ContainerError::InvalidArgument("a set needs at least one bucket"))
        );

        let mut set = HashingSet::with_bucket_count(1).unwrap();
        set.extend([Number(4), Number(2), Number(4)]);
        assert_eq!(sorted(&set), vec![2, 4]);
    }

    #[test]
    fn displays_elements() {
        assert_eq!(HashingSet::<Number>::new().to_string(), "{}");
        assert_eq!(numbers(&[2, 1]).to_string(), "{ 1, 2 }");
    }

    #[test]
    fn random_algebra_matches_std() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let mut random_numbers = || -> Vec<u32> {
                let length = rng.gen_range(0..300);
                (0..length).map(|_| rng.gen_range(0..400)).collect()
            };
            let left = random_numbers();
            let right = random_numbers();
            let std_left: HashSet<u32> = left.iter().copied().collect();
            let std_right: HashSet<u32> = right.iter().copied().collect();

            let mut union = numbers(&left);
            union.union(numbers(&right));
            assert_eq!(sorted(&union), std_left.union(&std_right).copied().sorted().collect_vec());

            let mut intersection = numbers(&left);
            intersection.intersection(numbers(&right));
            assert_eq!(
                sorted(&intersection),
                std_left.intersection(&std_right).copied().sorted().collect_vec()
            );

            let mut difference = numbers(&left);
            difference.subtraction(&numbers(&right));
            assert_eq!(
                sorted(&difference),
                std_left.difference(&std_right).copied().sorted().collect_vec()
            );
            assert_eq!(difference.len(), std_left.difference(&std_right).count());
        }
    }
}

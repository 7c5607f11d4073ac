/*
    A growable, order-preserving sequence with Python-style negative indexing
*/

use std::fmt::{self, Debug, Display};

use itertools::Itertools;

use super::ContainerError;

pub struct DynamicArray<T> {
    values: Vec<T>,
}

impl<T> DynamicArray<T> {
    pub fn new(initial_capacity: usize) -> Self {
        DynamicArray {
            values: Vec::with_capacity(initial_capacity.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn push(&mut self, value: T) {
        // Double when full
        if self.values.len() == self.values.capacity() {
            self.values.reserve_exact(self.values.capacity().max(1));
        }
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.values.pop()
    }

    // Maps -1 to the last element, -len to the first
    fn real_index(&self, index: i64) -> Option<usize> {
        let length = self.values.len() as i64;
        let real = if index < 0 { index + length } else { index };
        if (0..length).contains(&real) {
            Some(real as usize)
        } else {
            None
        }
    }

    pub fn get(&self, index: i64) -> Result<&T, ContainerError> {
        self.real_index(index)
            .map(|real| &self.values[real])
            .ok_or(ContainerError::IndexOutOfRange {
                index,
                length: self.values.len(),
            })
    }

    /// Appends every element of `src`, which is consumed.
    pub fn concat(&mut self, src: DynamicArray<T>) {
        for value in src {
            self.push(value);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Display> Display for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return write!(f, "[]");
        }

        let alternate = f.alternate();
        let values = self
            .values
            .iter()
            .map(|value| {
                if alternate {
                    format!("{:#}", value)
                } else {
                    value.to_string()
                }
            })
            .join(", ");
        write!(f, "[ {} ]", values)
    }
}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> DynamicArray<char> {
        let mut array = DynamicArray::new(1);
        for c in ['a', 'b', 'c'] {
            array.push(c);
        }
        array
    }

    #[test]
    fn negative_indexing() {
        let array = letters();

        assert_eq!(array.get(-1), Ok(&'c'));
        assert_eq!(array.get(-3), Ok(&'a'));
        assert_eq!(array.get(0), Ok(&'a'));
        assert_eq!(array.get(2), Ok(&'c'));
        assert_eq!(
            array.get(-4),
            Err(ContainerError::IndexOutOfRange { index: -4, length: 3 })
        );
        assert_eq!(
            array.get(3),
            Err(ContainerError::IndexOutOfRange { index: 3, length: 3 })
        );
    }

    #[test]
    fn capacity_doubles() {
        let mut array = DynamicArray::new(0);
        assert!(array.capacity() >= 1);

        for i in 0..9 {
            array.push(i);
        }
        assert_eq!(array.len(), 9);
        assert!(array.capacity() >= 9);
    }

    #[test]
    fn pop_returns_last() {
        let mut array = letters();
        assert_eq!(array.pop(), Some('c'));
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(-1), Ok(&'b'));

        let mut empty = DynamicArray::<char>::new(4);
        assert_eq!(empty.pop(), None);
    }

    #[test]
    fn concat_keeps_order() {
        let mut array = letters();
        let mut tail = DynamicArray::new(2);
        tail.push('d');
        tail.push('e');

        array.concat(tail);

        assert_eq!(array.iter().collect::<String>(), "abcde");
        assert_eq!(array.to_string(), "[ a, b, c, d, e ]");
        assert_eq!(DynamicArray::<char>::new(1).to_string(), "[]");
    }
}

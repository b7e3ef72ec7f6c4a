//! Minimal capability shared by every stream the sizing nodes inspect.

use std::collections::VecDeque;

/// A container with a well-defined element count.
///
/// Sizing nodes only ever compare counts, so this is the whole interface
/// they need from the element type they are instantiated with.
pub trait Collection {
    /// Returns the number of elements.
    fn size(&self) -> usize;

    /// Returns `true` when the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<T> Collection for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Collection for [T] {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Collection for VecDeque<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;
    use std::collections::VecDeque;

    #[test]
    fn size_matches_len_for_std_containers() {
        let items = vec![1u8, 2, 3];
        assert_eq!(Collection::size(&items), 3);
        assert_eq!(Collection::size(&items[..2]), 2);
        assert!(Collection::is_empty(&items[..0]));

        let mut queue: VecDeque<u8> = VecDeque::new();
        assert!(Collection::is_empty(&queue));
        queue.push_back(7);
        assert_eq!(Collection::size(&queue), 1);
    }
}

use std::fmt::{self, Display};
use std::mem;

use crate::error::{Error, Result};

////////////////////////////////////////////////////////////////////////////////

struct Node<T> {
    value: T,
    next: Option<Box<Node<T>>>,
}

/// LIFO stack backed by a singly-linked chain of owned nodes.
///
/// `push`, `pop` and `peek` touch only the head and run in O(1). The
/// positional operations (`at`, `insert`, `substack`) have to follow the
/// chain link by link and cost O(pos); that cost is inherent to the
/// representation and is what makes [`sort_by`](LinkStack::sort_by) slower
/// than an array-backed insertion sort.
pub struct LinkStack<T> {
    head: Option<Box<Node<T>>>,
    size: usize,
}

impl<T> Default for LinkStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkStack<T> {
    pub fn new() -> Self {
        Self {
            head: None,
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Pushes `value` on top of the stack.
    pub fn push(&mut self, value: T) {
        let node = Box::new(Node {
            value,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.size += 1;
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Result<T> {
        match self.head.take() {
            Some(node) => {
                self.head = node.next;
                self.size -= 1;
                Ok(node.value)
            }
            None => Err(Error::Underflow),
        }
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> Result<&T> {
        self.head
            .as_deref()
            .map(|node| &node.value)
            .ok_or(Error::Underflow)
    }

    /// Removes at most `depth` elements from the top. A depth past the end
    /// of the chain is clamped, not rejected.
    pub fn clear_front(&mut self, depth: usize) {
        let depth = depth.min(self.size);
        for _ in 0..depth {
            let _ = self.pop();
        }
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.clear_front(self.size);
    }

    /// Iterates the elements front-to-back, top of the stack first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: self.head.as_deref(),
        }
    }

    fn node_at(&self, pos: usize) -> Option<&Node<T>> {
        let mut current = self.head.as_deref();
        for _ in 0..pos {
            current = current?.next.as_deref();
        }
        current
    }

    /// Returns the element at `pos`, counting from the top of the stack.
    /// Costs O(pos): the chain has next links only, no random access.
    pub fn at(&self, pos: usize) -> Result<&T> {
        self.node_at(pos)
            .map(|node| &node.value)
            .ok_or(Error::IndexOutOfBounds {
                pos,
                size: self.size,
            })
    }

    /// Mutable variant of [`at`](LinkStack::at).
    pub fn at_mut(&mut self, pos: usize) -> Result<&mut T> {
        let size = self.size;
        let mut current = self.head.as_deref_mut();
        for _ in 0..pos {
            current = current.and_then(|node| node.next.as_deref_mut());
        }
        current
            .map(|node| &mut node.value)
            .ok_or(Error::IndexOutOfBounds { pos, size })
    }

    /// Drains `other` onto `self` by repeated pop/push. Pop removes the
    /// front first, so `other`'s elements end up on `self`'s front in
    /// reverse of their front-to-back order. `other` is left empty.
    pub fn consume(&mut self, other: &mut LinkStack<T>) {
        while let Ok(value) = other.pop() {
            self.push(value);
        }
    }

    /// Inserts `value` so that it ends up at position `pos`; every other
    /// element keeps its relative order. Costs O(pos).
    ///
    /// The first `pos` elements are popped onto a scratch chain, `value` is
    /// pushed, and the scratch chain is drained back. Popping reversed the
    /// prefix once and the drain reverses it again, so the prefix comes
    /// back in its original order.
    pub fn insert(&mut self, value: T, pos: usize) -> Result<()> {
        if pos > self.size {
            return Err(Error::OutOfBounds {
                pos,
                size: self.size,
            });
        }

        let mut rotation = Rotation::new(self, pos);
        rotation.chain().push(value);

        Ok(())
    }

    /// Binary-insertion sort driven by `cmp`, where `cmp(a, b)` returns
    /// true iff `a` must come strictly before `b`. No-op on an empty stack.
    ///
    /// Elements comparing equal under `cmp` are inserted in front of
    /// previously placed equals, so ties end up in reverse of their
    /// original relative order. Every binary-search probe reads the chain
    /// in O(pos), which makes the whole sort roughly quadratic; that is a
    /// property of the linked representation, not of the search.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.is_empty() {
            return;
        }

        let mut original = mem::take(self);
        if let Ok(first) = original.pop() {
            self.push(first);
        }

        loop {
            let pos = match original.peek() {
                Ok(target) => self.lower_bound(target, &mut cmp),
                Err(_) => break,
            };
            let Ok(value) = original.pop() else { break };
            // lower_bound keeps pos <= len, so insert cannot fail
            let _ = self.insert(value, pos);
        }
    }

    /// First position whose element does not strictly precede `target`.
    fn lower_bound<F>(&self, target: &T, cmp: &mut F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut left = 0;
        let mut right = self.size;

        while left < right {
            let pivot = left + (right - left) / 2;
            let precedes = self
                .node_at(pivot)
                .map_or(false, |node| cmp(&node.value, target));

            if precedes {
                left = pivot + 1;
            } else {
                right = pivot;
            }
        }

        right
    }
}

impl<T: Clone> LinkStack<T> {
    /// Creates a stack of `size` copies of `value`. Fails with
    /// [`Error::InvalidSize`] when `size` is zero.
    pub fn with_value(size: usize, value: T) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize);
        }

        let mut stack = Self::new();
        for _ in 0..size {
            stack.push(value.clone());
        }

        Ok(stack)
    }

    /// Copies the elements at positions `start..end` into a new stack.
    ///
    /// The copy is popped front-to-back while each element is pushed onto
    /// the result, so the returned stack holds the selected range in
    /// **reverse** order. The reversal is part of the contract.
    pub fn substack(&self, start: usize, end: usize) -> Result<LinkStack<T>> {
        if start > end || end > self.size {
            return Err(Error::InvalidRange {
                start,
                end,
                size: self.size,
            });
        }

        let mut scratch = self.clone();
        scratch.clear_front(start);

        let mut result = LinkStack::new();
        for _ in start..end {
            result.push(scratch.pop()?);
        }

        Ok(result)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Prefix of a stack popped off onto a scratch chain. Dropping the guard
/// drains the scratch chain back, restoring the original order even if the
/// caller unwinds mid-rotation.
struct Rotation<'a, T> {
    chain: &'a mut LinkStack<T>,
    scratch: LinkStack<T>,
}

impl<'a, T> Rotation<'a, T> {
    /// Pops the first `depth` elements of `chain` onto the scratch chain.
    /// The caller must have checked `depth <= chain.len()`.
    fn new(chain: &'a mut LinkStack<T>, depth: usize) -> Self {
        let mut scratch = LinkStack::new();
        for _ in 0..depth {
            if let Ok(value) = chain.pop() {
                scratch.push(value);
            }
        }

        Self { chain, scratch }
    }

    /// The rotated chain; its head is the element that was at the rotation
    /// depth before the prefix came off.
    fn chain(&mut self) -> &mut LinkStack<T> {
        self.chain
    }
}

impl<T> Drop for Rotation<'_, T> {
    fn drop(&mut self) {
        self.chain.consume(&mut self.scratch);
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<T: Clone> Clone for LinkStack<T> {
    /// Deep copy: every node is cloned individually, order and count are
    /// preserved, and no node is ever shared between two stacks.
    fn clone(&self) -> Self {
        let mut copy = LinkStack::new();
        let mut tail = &mut copy.head;
        let mut current = self.head.as_deref();

        while let Some(node) = current {
            let cloned = Box::new(Node {
                value: node.value.clone(),
                next: None,
            });
            tail = &mut tail.insert(cloned).next;
            current = node.next.as_deref();
        }

        copy.size = self.size;
        copy
    }
}

impl<T> Drop for LinkStack<T> {
    // Letting Box drop the chain would recurse once per node; long chains
    // overflow the call stack that way.
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.take();
        }
    }
}

impl<T: PartialEq> PartialEq for LinkStack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkStack<T> {}

impl<T: fmt::Debug> fmt::Debug for LinkStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Display> Display for LinkStack<T> {
    /// Elements from top to bottom, separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

pub struct Iter<'a, T> {
    current: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(&node.value)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stack_of(values: &[i32]) -> LinkStack<i32> {
        // pushed in reverse so that front-to-back order matches `values`
        let mut stack = LinkStack::new();
        for &value in values.iter().rev() {
            stack.push(value);
        }
        stack
    }

    fn contents(stack: &LinkStack<i32>) -> Vec<i32> {
        stack.iter().copied().collect()
    }

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = LinkStack::new();
        for value in [1, 2, 3] {
            stack.push(value);
        }

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.peek(), Ok(&3));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_and_peek_underflow_on_empty() {
        let mut stack = LinkStack::<i32>::new();
        assert_eq!(stack.pop(), Err(Error::Underflow));
        assert_eq!(stack.peek(), Err(Error::Underflow));
    }

    #[test]
    fn with_value_fills_every_position() {
        let stack = LinkStack::with_value(4, 7).unwrap();
        assert_eq!(stack.len(), 4);
        for pos in 0..4 {
            assert_eq!(stack.at(pos), Ok(&7));
        }
    }

    #[test]
    fn with_value_rejects_zero_size() {
        assert_eq!(LinkStack::with_value(0, 7), Err(Error::InvalidSize));
    }

    #[test]
    fn at_reads_without_disturbing_order() {
        let mut stack = stack_of(&[10, 20, 30, 40]);
        let before = contents(&stack);

        assert_eq!(stack.at(0), Ok(&10));
        assert_eq!(stack.at(2), Ok(&30));
        assert_eq!(stack.at(3), Ok(&40));

        assert_eq!(contents(&stack), before);
        assert_eq!(stack.len(), 4);
        assert_eq!(
            stack.at(4),
            Err(Error::IndexOutOfBounds { pos: 4, size: 4 })
        );
    }

    #[test]
    fn at_mut_writes_through() {
        let mut stack = stack_of(&[1, 2, 3]);
        *stack.at_mut(1).unwrap() = 99;
        assert_eq!(contents(&stack), vec![1, 99, 3]);
        assert_eq!(
            stack.at_mut(3),
            Err(Error::IndexOutOfBounds { pos: 3, size: 3 })
        );
    }

    #[test]
    fn insert_places_value_at_position() {
        let mut stack = stack_of(&[1, 2, 3, 4]);

        stack.insert(99, 2).unwrap();
        assert_eq!(contents(&stack), vec![1, 2, 99, 3, 4]);
        assert_eq!(stack.len(), 5);

        stack.insert(-1, 0).unwrap();
        assert_eq!(contents(&stack), vec![-1, 1, 2, 99, 3, 4]);

        stack.insert(77, 6).unwrap();
        assert_eq!(contents(&stack), vec![-1, 1, 2, 99, 3, 4, 77]);
    }

    #[test]
    fn insert_rejects_position_past_end() {
        let mut stack = stack_of(&[1, 2]);
        assert_eq!(
            stack.insert(3, 5),
            Err(Error::OutOfBounds { pos: 5, size: 2 })
        );
        assert_eq!(contents(&stack), vec![1, 2]);
    }

    #[test]
    fn rotation_round_trip_is_identity() {
        let mut stack = stack_of(&[1, 2, 3, 4, 5]);

        {
            let mut rotation = Rotation::new(&mut stack, 3);
            assert_eq!(rotation.chain().peek(), Ok(&4));
        }

        assert_eq!(contents(&stack), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn consume_reverses_and_empties_source() {
        let mut target = stack_of(&[1, 2]);
        let mut source = stack_of(&[10, 20, 30]);

        target.consume(&mut source);

        assert_eq!(contents(&target), vec![30, 20, 10, 1, 2]);
        assert!(source.is_empty());
    }

    #[test]
    fn clone_is_deep() {
        let original = stack_of(&[1, 2, 3]);
        let mut copy = original.clone();

        assert_eq!(copy, original);

        copy.pop().unwrap();
        *copy.at_mut(0).unwrap() = 42;

        assert_eq!(contents(&original), vec![1, 2, 3]);
        assert_eq!(contents(&copy), vec![42, 3]);
    }

    #[test]
    fn substack_returns_reversed_range() {
        let stack = stack_of(&[0, 1, 2, 3, 4]);
        let sub = stack.substack(1, 4).unwrap();

        assert_eq!(contents(&sub), vec![3, 2, 1]);
        assert_eq!(contents(&stack), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn substack_rejects_invalid_ranges() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(
            stack.substack(2, 1),
            Err(Error::InvalidRange {
                start: 2,
                end: 1,
                size: 3
            })
        );
        assert_eq!(
            stack.substack(1, 4),
            Err(Error::InvalidRange {
                start: 1,
                end: 4,
                size: 3
            })
        );
    }

    #[test]
    fn substack_of_full_range_reverses_everything() {
        let stack = stack_of(&[1, 2, 3]);
        let sub = stack.substack(0, 3).unwrap();
        assert_eq!(contents(&sub), vec![3, 2, 1]);
    }

    #[test]
    fn clear_front_clamps_depth() {
        let mut stack = stack_of(&[1, 2, 3]);

        stack.clear_front(2);
        assert_eq!(contents(&stack), vec![3]);

        stack.clear_front(100);
        assert!(stack.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), Err(Error::Underflow));
    }

    #[test]
    fn sort_orders_ascending() {
        let mut stack = stack_of(&[5, 1, 4, 1, 5, 9, 2, 6]);
        stack.sort_by(|a, b| a < b);
        assert_eq!(contents(&stack), vec![1, 1, 2, 4, 5, 5, 6, 9]);
    }

    #[test]
    fn sort_orders_descending() {
        let mut stack = stack_of(&[3, 1, 2]);
        stack.sort_by(|a, b| a > b);
        assert_eq!(contents(&stack), vec![3, 2, 1]);
    }

    #[test]
    fn sort_reverses_equal_keys() {
        // compare on the key only; the tag records original order
        let mut stack = LinkStack::new();
        for pair in [(1, 'c'), (0, 'x'), (1, 'b'), (1, 'a')].into_iter().rev() {
            stack.push(pair);
        }

        stack.sort_by(|a, b| a.0 < b.0);

        let sorted: Vec<(i32, char)> = stack.iter().copied().collect();
        assert_eq!(sorted, vec![(0, 'x'), (1, 'a'), (1, 'b'), (1, 'c')]);
    }

    #[test]
    fn sort_handles_empty_and_single() {
        let mut empty = LinkStack::<i32>::new();
        empty.sort_by(|a, b| a < b);
        assert!(empty.is_empty());

        let mut single = stack_of(&[42]);
        single.sort_by(|a, b| a < b);
        assert_eq!(contents(&single), vec![42]);
    }

    #[test]
    fn display_is_space_separated_top_to_bottom() {
        let stack = stack_of(&[3, 1, 2]);
        assert_eq!(stack.to_string(), "3 1 2");
        assert_eq!(LinkStack::<i32>::new().to_string(), "");
    }

    #[test]
    fn long_chain_drops_without_overflow() {
        let mut stack = LinkStack::new();
        for value in 0..100_000 {
            stack.push(value);
        }
        drop(stack);
    }
}

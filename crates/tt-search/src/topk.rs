//! Bounded top-K selection with deterministic tie-breaking.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::generator::GenerationOrder;

/// A scored item kept by [`TopK`].
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    /// Policy score.
    pub score: f64,
    /// Generation order; earlier wins ties.
    pub order: GenerationOrder,
    /// Payload.
    pub item: T,
}

impl<T> Ranked<T> {
    /// Ordering where `Greater` means "ranks higher".
    fn precedence(&self, other: &Self) -> Ordering {
        precedence(self.score, self.order, other.score, other.order)
    }
}

fn precedence(score: f64, order: GenerationOrder, other_score: f64, other_order: GenerationOrder) -> Ordering {
    score
        .total_cmp(&other_score)
        .then_with(|| other_order.cmp(&order))
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Equal
    }
}

impl<T> Eq for Ranked<T> {}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence(other)
    }
}

/// Min-heap of the `capacity` best items seen so far.
#[derive(Debug, Clone)]
pub struct TopK<T> {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked<T>>>,
}

impl<T> TopK<T> {
    /// Creates an empty selection keeping at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
        }
    }

    /// Maximum number of kept items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of kept items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is kept.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The item currently ranked last, if any.
    pub fn worst(&self) -> Option<&Ranked<T>> {
        self.heap.peek().map(|entry| &entry.0)
    }

    /// True when an item with this score and order would be kept. Lets
    /// callers skip building payloads that would be rejected.
    pub fn accepts(&self, score: f64, order: GenerationOrder) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            return true;
        }
        match self.worst() {
            Some(worst) => precedence(score, order, worst.score, worst.order) == Ordering::Greater,
            None => true,
        }
    }

    /// Offers an item; returns true when it was kept.
    pub fn offer(&mut self, score: f64, order: GenerationOrder, item: T) -> bool {
        if !self.accepts(score, order) {
            return false;
        }
        self.heap.push(Reverse(Ranked { score, order, item }));
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
        true
    }

    /// Folds another selection into this one.
    pub fn merge(&mut self, other: TopK<T>) {
        for Reverse(entry) in other.heap {
            self.offer(entry.score, entry.order, entry.item);
        }
    }

    /// Kept items, best first: descending score, ties by generation order.
    pub fn into_sorted(self) -> Vec<Ranked<T>> {
        let mut items: Vec<Ranked<T>> = self.heap.into_iter().map(|entry| entry.0).collect();
        items.sort_by(|a, b| b.cmp(a));
        items
    }
}

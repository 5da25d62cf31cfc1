//! Weighted selection primitives shared by every generation phase.

use crate::rng::index_for_roll;

/// Picks one item by consuming `roll * total_weight` in list order.
///
/// Items with a non-positive weight are skipped. The first item whose weight
/// takes the remaining value to zero or below wins; when floating-point drift
/// leaves a sliver unconsumed the last item in the list is returned, whatever
/// its weight. `None` only when no item carries positive weight.
pub fn pick_weighted<T>(items: &[T], weight: impl Fn(&T) -> f64, roll: f64) -> Option<&T> {
    pick_weighted_index(items, weight, roll).map(|index| &items[index])
}

pub fn pick_weighted_index<T>(items: &[T], weight: impl Fn(&T) -> f64, roll: f64) -> Option<usize> {
    let total: f64 = items.iter().map(|item| positive(weight(item))).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = roll * total;
    for (index, item) in items.iter().enumerate() {
        let item_weight = positive(weight(item));
        if item_weight <= 0.0 {
            continue;
        }
        remaining -= item_weight;
        if remaining <= 0.0 {
            return Some(index);
        }
    }
    Some(items.len() - 1)
}

fn positive(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}

/// Pre-filtered picker for a table that is sampled many times.
#[derive(Clone, Debug)]
pub struct WeightedTable<'a, T> {
    entries: Vec<(&'a T, f64)>,
    total: f64,
    fallback: Option<&'a T>,
}

impl<'a, T> WeightedTable<'a, T> {
    pub fn new(items: &'a [T], weight: impl Fn(&T) -> f64) -> Self {
        let entries: Vec<(&'a T, f64)> = items
            .iter()
            .map(|item| (item, positive(weight(item))))
            .filter(|(_, item_weight)| *item_weight > 0.0)
            .collect();
        let total = entries.iter().map(|(_, item_weight)| item_weight).sum();
        let fallback = if entries.is_empty() { None } else { items.last() };
        Self { entries, total, fallback }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pick(&self, roll: f64) -> Option<&'a T> {
        let mut remaining = roll * self.total;
        for (item, item_weight) in &self.entries {
            remaining -= item_weight;
            if remaining <= 0.0 {
                return Some(*item);
            }
        }
        self.fallback
    }
}

/// Candidates that can each be drawn at most once.
///
/// Draws never mutate the backing slice; they record the taken index instead.
#[derive(Clone, Debug)]
pub struct RemainingPool<'a, T> {
    items: &'a [T],
    taken: Vec<bool>,
}

impl<'a, T> RemainingPool<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, taken: vec![false; items.len()] }
    }

    pub fn len(&self) -> usize {
        self.taken.iter().filter(|taken| !**taken).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().zip(&self.taken).filter(|(_, taken)| !**taken).map(|(item, _)| item)
    }

    /// Weighted draw over the untaken items. The drawn item is removed.
    pub fn take_weighted(&mut self, weight: impl Fn(&T) -> f64, roll: f64) -> Option<&'a T> {
        let open: Vec<usize> = self.open_indices().collect();
        let position = pick_weighted_index(&open, |index| weight(&self.items[*index]), roll)?;
        Some(self.take_at(open[position]))
    }

    /// Uniform draw over the untaken items, `floor(roll * len)`.
    pub fn take_uniform(&mut self, roll: f64) -> Option<&'a T> {
        self.take_uniform_where(roll, |_| true)
    }

    /// Uniform draw restricted to untaken items matching `predicate`.
    pub fn take_uniform_where(&mut self, roll: f64, predicate: impl Fn(&T) -> bool) -> Option<&'a T> {
        let open: Vec<usize> =
            self.open_indices().filter(|index| predicate(&self.items[*index])).collect();
        if open.is_empty() {
            return None;
        }
        let position = index_for_roll(roll, open.len());
        Some(self.take_at(open[position]))
    }

    /// Drops every untaken item matching `predicate` without returning it.
    pub fn discard_where(&mut self, predicate: impl Fn(&T) -> bool) {
        for (item, taken) in self.items.iter().zip(self.taken.iter_mut()) {
            if !*taken && predicate(item) {
                *taken = true;
            }
        }
    }

    fn open_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.taken.iter().enumerate().filter(|(_, taken)| !**taken).map(|(index, _)| index)
    }

    fn take_at(&mut self, index: usize) -> &'a T {
        self.taken[index] = true;
        &self.items[index]
    }
}

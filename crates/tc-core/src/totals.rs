//! Accumulated (total, billable) durations.

use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Duration;

use crate::types::TaskId;

/// Accumulated duration pair.
///
/// Billable time is a subset of total time: every billable second is also
/// counted in `total`. Addition saturates at [`Duration::MAX`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total: Duration,
    pub billable: Duration,
}

impl Totals {
    pub const ZERO: Self = Self {
        total: Duration::ZERO,
        billable: Duration::ZERO,
    };

    /// Totals for a single entry.
    pub const fn from_entry(duration: Duration, billable: bool) -> Self {
        Self {
            total: duration,
            billable: if billable { duration } else { Duration::ZERO },
        }
    }

    /// Time that was recorded but not billable.
    pub fn non_billable(&self) -> Duration {
        self.total.saturating_sub(self.billable)
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total: self.total.saturating_add(rhs.total),
            billable: self.billable.saturating_add(rhs.billable),
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Totals per task, built fresh for each aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTotals(HashMap<TaskId, Totals>);

impl TaskTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `totals` to the task's running totals, creating the entry on
    /// first contribution.
    pub fn add(&mut self, task_id: &TaskId, totals: Totals) {
        *self.0.entry(task_id.clone()).or_default() += totals;
    }

    /// Totals for the task, zero if it never received a contribution.
    pub fn get(&self, task_id: &TaskId) -> Totals {
        self.0.get(task_id).copied().unwrap_or_default()
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.0.contains_key(task_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &Totals)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaskTotals {
    type Item = (&'a TaskId, &'a Totals);
    type IntoIter = std::collections::hash_map::Iter<'a, TaskId, Totals>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

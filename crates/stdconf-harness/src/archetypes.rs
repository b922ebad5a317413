//! Instrumented element types used by the cases.

use std::cell::Cell;
use std::rc::Rc;

use stdconf_core::{AssignFrom, WeaklyIncrementable};

/// Counts special-member activity of [`TrackedValue`]s sharing it.
///
/// Owned by a single case invocation; nothing is shared across cases.
#[derive(Debug, Default)]
pub struct AssignTracker {
    constructed: Cell<usize>,
    copy_assigned: Cell<usize>,
    move_assigned: Cell<usize>,
}

impl AssignTracker {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn constructed(&self) -> usize {
        self.constructed.get()
    }

    pub fn copy_assigned(&self) -> usize {
        self.copy_assigned.get()
    }

    pub fn move_assigned(&self) -> usize {
        self.move_assigned.get()
    }

    /// Copy plus move assignments.
    pub fn assigned(&self) -> usize {
        self.copy_assigned() + self.move_assigned()
    }

    /// Zero every counter, typically after fixture setup.
    pub fn reset(&self) {
        self.constructed.set(0);
        self.copy_assigned.set(0);
        self.move_assigned.set(0);
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }
}

/// An `i32` that reports constructions and assignments to its tracker.
#[derive(Debug)]
pub struct TrackedValue {
    pub value: i32,
    tracker: Rc<AssignTracker>,
}

impl TrackedValue {
    #[must_use]
    pub fn new(value: i32, tracker: &Rc<AssignTracker>) -> Self {
        AssignTracker::bump(&tracker.constructed);
        Self {
            value,
            tracker: Rc::clone(tracker),
        }
    }
}

impl Clone for TrackedValue {
    fn clone(&self) -> Self {
        Self::new(self.value, &self.tracker)
    }
}

impl PartialEq for TrackedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl AssignFrom<&TrackedValue> for TrackedValue {
    fn assign_from(&mut self, src: &TrackedValue) {
        AssignTracker::bump(&self.tracker.copy_assigned);
        self.value = src.value;
    }
}

impl AssignFrom<TrackedValue> for TrackedValue {
    fn assign_from(&mut self, src: TrackedValue) {
        AssignTracker::bump(&self.tracker.move_assigned);
        self.value = src.value;
    }
}

/// Weakly incrementable and regular, but not incrementable: post-increment
/// yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepCounter(pub u32);

impl WeaklyIncrementable for StepCounter {
    type Difference = i64;
    type PostIncrement = ();

    fn pre_increment(&mut self) -> &mut Self {
        self.0 = self.0.wrapping_add(1);
        self
    }

    fn post_increment(&mut self) {
        self.pre_increment();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdconf_core::Pair;

    #[test]
    fn tracker_counts_each_kind() {
        let tracker = AssignTracker::new();
        let mut a = TrackedValue::new(1, &tracker);
        let b = a.clone();
        assert_eq!(tracker.constructed(), 2);

        a.assign_from(&b);
        a.assign_from(b);
        assert_eq!(tracker.copy_assigned(), 1);
        assert_eq!(tracker.move_assigned(), 1);
        assert_eq!(tracker.assigned(), 2);

        tracker.reset();
        assert_eq!(tracker.constructed(), 0);
        assert_eq!(tracker.assigned(), 0);
    }

    #[test]
    fn pair_move_assignment_moves_tracked_element() {
        let tracker = AssignTracker::new();
        let mut target = Pair::new(0_i64, TrackedValue::new(0, &tracker));
        let source = Pair::new(5_i32, TrackedValue::new(-5, &tracker));
        tracker.reset();

        target.assign_from_owned(source);
        assert_eq!(target.first, 5);
        assert_eq!(target.second.value, -5);
        assert_eq!(tracker.move_assigned(), 1);
        assert_eq!(tracker.copy_assigned(), 0);
        assert_eq!(tracker.constructed(), 0);
    }

    #[test]
    fn step_counter_advances() {
        let mut c = StepCounter(u32::MAX);
        c.post_increment();
        assert_eq!(c, StepCounter(0));
        assert_eq!(*c.pre_increment(), StepCounter(1));
    }
}

//! Optimistic history engine
//!
//! An optimistic slice keeps the last confirmed state (`checkpoint`) and the
//! ordered log of mutations applied ahead of server confirmation. The visible
//! state is always `checkpoint` folded with the whole history.
//!
//! Failure is advisory: a failed entry stays in history with `failed = true`
//! and is still folded unless the domain opts out through
//! [`OptimisticMatchers::skip_failed`]. Rolling an entry back is the separate,
//! explicit [`OptimisticState::revert`].

use crate::actions::{Action, ActionKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisticHistoryItem<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub failed: bool,
    pub data: A,
}

impl<A> OptimisticHistoryItem<A> {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, data: A) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            failed: false,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisticState<T, A> {
    pub checkpoint: T,
    pub history: Vec<OptimisticHistoryItem<A>>,
}

impl<T: Default, A> Default for OptimisticState<T, A> {
    fn default() -> Self {
        Self {
            checkpoint: T::default(),
            history: Vec::new(),
        }
    }
}

impl<T, A> OptimisticState<T, A> {
    pub fn new(checkpoint: T) -> Self {
        Self {
            checkpoint,
            history: Vec::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.history.iter().position(|item| item.id == id)
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter(|item| item.failed)
            .map(|item| item.id.as_str())
            .collect()
    }

    pub fn pending_ids(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter(|item| !item.failed)
            .map(|item| item.id.as_str())
            .collect()
    }

    /// Append a mutation. Ids must be unique among held history; a colliding
    /// apply is dropped and reported.
    pub fn apply(mut self, item: OptimisticHistoryItem<A>) -> Self {
        if self.contains(&item.id) {
            log::error!(
                "[Optimistic::Apply] history already holds an entry with id {}",
                item.id
            );
            return self;
        }

        self.history.push(item);
        self
    }

    /// Flag the matching entry as failed. Unknown ids leave the state as is:
    /// the mutation was already committed or reverted through another path.
    pub fn fail(mut self, id: &str) -> Self {
        match self.position(id) {
            Some(index) => {
                self.history[index].failed = true;
                self
            }
            None => {
                log::warn!("[Optimistic::Fail] no history entry for id {}", id);
                self
            }
        }
    }

    /// Fold every entry up to and including `id` into the checkpoint, in
    /// order, and keep the remainder as history.
    pub fn commit<F>(self, id: &str, reducer: F) -> Self
    where
        F: Fn(T, &OptimisticHistoryItem<A>) -> T,
    {
        let Some(index) = self.position(id) else {
            log::warn!("[Optimistic::Commit] no history entry for id {}", id);
            return self;
        };

        let Self {
            checkpoint,
            mut history,
        } = self;
        let remainder = history.split_off(index + 1);
        let checkpoint = history.iter().fold(checkpoint, &reducer);

        Self {
            checkpoint,
            history: remainder,
        }
    }

    /// Explicit rollback: drop the matching entry without folding it.
    pub fn revert(mut self, id: &str) -> Self {
        match self.position(id) {
            Some(index) => {
                self.history.remove(index);
                self
            }
            None => {
                log::warn!("[Optimistic::Revert] no history entry for id {}", id);
                self
            }
        }
    }

    /// Reduce the checkpoint directly, keeping pending history untouched.
    pub fn map_checkpoint<F>(self, f: F) -> Self
    where
        F: FnOnce(T) -> T,
    {
        Self {
            checkpoint: f(self.checkpoint),
            history: self.history,
        }
    }

    /// Visible state: checkpoint folded with the whole history.
    pub fn materialize<F>(&self, reducer: F) -> T
    where
        T: Clone,
        F: Fn(T, &OptimisticHistoryItem<A>) -> T,
    {
        self.history
            .iter()
            .fold(self.checkpoint.clone(), reducer)
    }
}

/// Routes actions of one domain onto the engine operations.
pub struct OptimisticMatchers {
    pub initiate: fn(&ActionKind) -> bool,
    pub commit: fn(&ActionKind) -> bool,
    pub fail: fn(&ActionKind) -> bool,
    pub revert: fn(&ActionKind) -> bool,
    /// Intents whose failed entries are left out of the fold
    pub skip_failed: fn(&ActionKind) -> bool,
}

/// A domain reducer wrapped with optimistic history handling.
pub struct OptimisticReducer<T> {
    pub matchers: OptimisticMatchers,
    pub reducer: fn(T, &Action) -> T,
}

impl<T: Clone> OptimisticReducer<T> {
    fn fold(&self, state: T, item: &OptimisticHistoryItem<Action>) -> T {
        if item.failed && (self.matchers.skip_failed)(&item.data.kind) {
            return state;
        }
        (self.reducer)(state, &item.data)
    }

    pub fn reduce(&self, state: OptimisticState<T, Action>, action: &Action) -> OptimisticState<T, Action> {
        let Some(id) = action.meta.optimistic_id.as_deref() else {
            return state.map_checkpoint(|checkpoint| (self.reducer)(checkpoint, action));
        };

        let kind = &action.kind;

        if (self.matchers.initiate)(kind) {
            let state = if state.contains(id) {
                log::info!("[Optimistic::Retry] replacing history entry {}", id);
                state.revert(id)
            } else {
                state
            };
            let item = OptimisticHistoryItem::new(id, kind.name(), action.without_callback());
            return state.apply(item);
        }

        if (self.matchers.commit)(kind) {
            // Settled elsewhere (reverted, or reset by signout) before the
            // confirmation came back.
            if !state.contains(id) {
                log::warn!("[Optimistic::Commit] ignoring late {} for {}", kind.name(), id);
                return state;
            }
            return state
                .commit(id, |acc, item| self.fold(acc, item))
                .map_checkpoint(|checkpoint| (self.reducer)(checkpoint, action));
        }

        if (self.matchers.fail)(kind) {
            return state.fail(id);
        }

        if (self.matchers.revert)(kind) {
            return state.revert(id);
        }

        state.map_checkpoint(|checkpoint| (self.reducer)(checkpoint, action))
    }

    pub fn visible(&self, state: &OptimisticState<T, Action>) -> T {
        state.materialize(|acc, item| self.fold(acc, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestState = OptimisticState<Vec<i32>, i32>;

    fn add(mut state: Vec<i32>, item: &OptimisticHistoryItem<i32>) -> Vec<i32> {
        state.push(item.data);
        state
    }

    fn add_unless_failed(state: Vec<i32>, item: &OptimisticHistoryItem<i32>) -> Vec<i32> {
        if item.failed {
            state
        } else {
            add(state, item)
        }
    }

    fn item(id: &str, value: i32) -> OptimisticHistoryItem<i32> {
        OptimisticHistoryItem::new(id, "add", value)
    }

    #[test]
    fn test_fail_unknown_id_is_noop() {
        let state: TestState = OptimisticState::new(vec![]).apply(item("a", 1));
        let result = state.clone().fail("missing");
        assert_eq!(result, state);
    }

    #[test]
    fn test_fail_flags_matching_entry_only() {
        let state: TestState = OptimisticState::new(vec![0])
            .apply(item("a", 1))
            .apply(item("b", 2));

        let result = state.fail("a");
        assert!(result.history[0].failed);
        assert!(!result.history[1].failed);
        assert_eq!(result.history[0].id, "a");
        assert_eq!(result.history[1].id, "b");
        assert_eq!(result.checkpoint, vec![0]);
    }

    #[test]
    fn test_apply_fail_commit_folds_flagged_item() {
        let state: TestState = OptimisticState::new(vec![0]).apply(item("a", 1));
        let flagged = state.clone().fail("a");
        let expected = add(vec![0], &flagged.history[0]);

        let committed = flagged.commit("a", add);
        assert_eq!(committed.checkpoint, expected);
        assert_eq!(committed.checkpoint, vec![0, 1]);
        assert!(committed.history.is_empty());
    }

    #[test]
    fn test_reducer_can_opt_out_of_failed_items() {
        let state: TestState = OptimisticState::new(vec![0])
            .apply(item("a", 1))
            .apply(item("b", 2))
            .fail("a");

        let committed = state.commit("b", add_unless_failed);
        assert_eq!(committed.checkpoint, vec![0, 2]);
    }

    #[test]
    fn test_commit_folds_prefix_in_order() {
        let state: TestState = OptimisticState::new(vec![])
            .apply(item("a", 1))
            .apply(item("b", 2))
            .apply(item("c", 3));

        let committed = state.commit("b", add);
        assert_eq!(committed.checkpoint, vec![1, 2]);
        assert_eq!(committed.history.len(), 1);
        assert_eq!(committed.history[0].id, "c");
        assert_eq!(committed.materialize(add), vec![1, 2, 3]);
    }

    #[test]
    fn test_commit_unknown_id_is_noop() {
        let state: TestState = OptimisticState::new(vec![]).apply(item("a", 1));
        assert_eq!(state.clone().commit("zzz", add), state);
    }

    #[test]
    fn test_fold_is_deterministic() {
        let state: TestState = OptimisticState::new(vec![7])
            .apply(item("a", 1))
            .apply(item("b", 2))
            .fail("b");

        assert_eq!(state.materialize(add), state.materialize(add));
        assert_eq!(
            state.clone().commit("b", add),
            state.clone().commit("b", add)
        );
    }

    #[test]
    fn test_revert_drops_without_folding() {
        let state: TestState = OptimisticState::new(vec![0])
            .apply(item("a", 1))
            .apply(item("b", 2));

        let reverted = state.revert("a");
        assert_eq!(reverted.checkpoint, vec![0]);
        assert_eq!(reverted.materialize(add), vec![0, 2]);
    }

    #[test]
    fn test_apply_rejects_duplicate_id() {
        let state: TestState = OptimisticState::new(vec![]).apply(item("a", 1));
        let result = state.clone().apply(item("a", 5));
        assert_eq!(result, state);
    }

    #[test]
    fn test_failed_and_pending_ids() {
        let state: TestState = OptimisticState::new(vec![])
            .apply(item("a", 1))
            .apply(item("b", 2))
            .fail("b");

        assert_eq!(state.failed_ids(), vec!["b"]);
        assert_eq!(state.pending_ids(), vec!["a"]);
    }
}

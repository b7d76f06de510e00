// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edit-step log for the reference graph.
//!
//! Every mutation is recorded as an operation. Mutations made inside a
//! named edit group are committed together as one step; mutations made
//! outside a group each become their own step. The log is what an undo
//! system would walk, so grouping decides what one undo reverts.

use std::collections::VecDeque;

/// Maximum number of steps kept
const MAX_HISTORY: usize = 100;

/// Operations committed as one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGroup {
    /// Step ID, increasing
    pub id: u64,
    /// Human-readable description
    pub description: String,
    /// Descriptions of the operations in this step
    pub operations: Vec<String>,
}

/// Log of committed edit steps
#[derive(Debug)]
pub struct EditLog {
    steps: VecDeque<EditGroup>,
    open: Option<EditGroup>,
    /// Nested `begin` calls folded into the open group
    nesting: usize,
    next_id: u64,
    max_depth: usize,
}

impl EditLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with a custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            steps: VecDeque::new(),
            open: None,
            nesting: 0,
            next_id: 1,
            max_depth,
        }
    }

    /// Open a named group; nested groups fold into the outermost one
    pub fn begin(&mut self, description: &str) {
        if self.open.is_some() {
            self.nesting += 1;
            return;
        }
        self.open = Some(EditGroup {
            id: self.take_id(),
            description: description.to_string(),
            operations: Vec::new(),
        });
    }

    /// Close the innermost open group
    pub fn end(&mut self) {
        if self.nesting > 0 {
            self.nesting -= 1;
            return;
        }
        if let Some(group) = self.open.take() {
            self.commit(group);
        }
    }

    /// Record one operation
    pub fn record(&mut self, operation: &str) {
        if let Some(group) = self.open.as_mut() {
            group.operations.push(operation.to_string());
            return;
        }
        let group = EditGroup {
            id: self.take_id(),
            description: operation.to_string(),
            operations: vec![operation.to_string()],
        };
        self.commit(group);
    }

    /// Check if a group is open
    pub fn is_grouping(&self) -> bool {
        self.open.is_some()
    }

    /// Get the number of committed steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if nothing was committed
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over committed steps, oldest first
    pub fn steps(&self) -> impl Iterator<Item = &EditGroup> {
        self.steps.iter()
    }

    /// Get the most recent step
    pub fn last(&self) -> Option<&EditGroup> {
        self.steps.back()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn commit(&mut self, group: EditGroup) {
        if group.operations.is_empty() {
            return;
        }
        self.steps.push_back(group);
        while self.steps.len() > self.max_depth {
            self.steps.pop_front();
        }
    }
}

impl Default for EditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungrouped_operations_are_separate_steps() {
        let mut log = EditLog::new();
        log.record("Move");
        log.record("Rename");
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|g| g.description.as_str()), Some("Rename"));
    }

    #[test]
    fn test_group_commits_one_step() {
        let mut log = EditLog::new();
        log.begin("Delete Nodes");
        log.record("Remove a");
        log.begin("inner");
        log.record("Remove b");
        log.end();
        assert!(log.is_grouping());
        log.end();
        assert_eq!(log.len(), 1);
        let step = log.last().unwrap();
        assert_eq!(step.description, "Delete Nodes");
        assert_eq!(step.operations.len(), 2);
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let mut log = EditLog::new();
        log.begin("Nothing");
        log.end();
        assert!(log.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let mut log = EditLog::with_max_depth(2);
        log.record("a");
        log.record("b");
        log.record("c");
        let names: Vec<_> = log.steps().map(|g| g.description.clone()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}

use serde::{Deserialize, Serialize};

/// A single task item. Ids are assigned by the owning [`TodoList`] and are
/// only unique within it.
///
/// The entity accepts any title; length and emptiness checks are the
/// caller's policy.
///
/// [`TodoList`]: super::TodoList
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub done: bool,
}

impl Todo {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    /// Idempotent; marking an already done todo is not an error.
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Idempotent; marking an already undone todo is not an error.
    pub fn mark_undone(&mut self) {
        self.done = false;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_starts_undone() {
        let todo = Todo::new(1, "Milk");
        assert_eq!(todo.id, 1);
        assert_eq!(todo.title, "Milk");
        assert!(!todo.is_done());
    }

    #[test]
    fn done_transitions_are_idempotent() {
        let mut todo = Todo::new(1, "Milk");

        todo.mark_done();
        assert!(todo.is_done());
        todo.mark_done();
        assert!(todo.is_done());

        todo.mark_undone();
        assert!(!todo.is_done());
        todo.mark_undone();
        assert!(!todo.is_done());
    }
}

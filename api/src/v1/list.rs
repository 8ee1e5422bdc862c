use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Todo;

/// A positional operation was given an index outside `[0, len)`.
///
/// This signals a stale index held by the caller, not bad user input, so
/// list operations fail loudly with it instead of silently doing nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("index {index} out of range for list of {len} todos")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// A named, ordered collection of [`Todo`]s.
///
/// Insertion order is preserved and every contained todo is owned
/// exclusively by its list. Todo ids are assigned from a list-scoped
/// counter; the counter is not serialized and must be rebuilt with
/// [`reseed`](Self::reseed) after deserializing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub id: u64,
    pub title: String,
    todos: Vec<Todo>,
    #[serde(skip)]
    next_todo_id: u64,
}

impl TodoList {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
            next_todo_id: 1,
        }
    }

    /// Appends a todo to the end of the sequence. No duplicate detection,
    /// no capacity limit. Keeps the id counter above the appended id so
    /// later [`create_todo`](Self::create_todo) calls stay collision-free.
    pub fn add(&mut self, todo: Todo) {
        self.next_todo_id = self.next_todo_id.max(todo.id + 1);
        self.todos.push(todo);
    }

    /// Creates a todo with a fresh list-scoped id and appends it.
    /// Returns the new todo's id.
    pub fn create_todo(&mut self, title: impl Into<String>) -> u64 {
        let id = self.next_todo_id;
        self.next_todo_id += 1;
        self.todos.push(Todo::new(id, title));
        id
    }

    pub fn size(&self) -> usize {
        self.todos.len()
    }

    pub fn first(&self) -> Option<&Todo> {
        self.todos.first()
    }

    pub fn last(&self) -> Option<&Todo> {
        self.todos.last()
    }

    /// Linear search by id; `None` when no todo matches.
    pub fn find_by_id(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: u64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    /// Position of the todo with the same id, or `None` if absent.
    pub fn find_index_of(&self, todo: &Todo) -> Option<usize> {
        self.todos.iter().position(|t| t.id == todo.id)
    }

    /// Removes and returns the todo at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Todo, OutOfRange> {
        self.check_index(index)?;
        Ok(self.todos.remove(index))
    }

    pub fn mark_done_at(&mut self, index: usize) -> Result<(), OutOfRange> {
        self.check_index(index)?;
        self.todos[index].mark_done();
        Ok(())
    }

    pub fn mark_undone_at(&mut self, index: usize) -> Result<(), OutOfRange> {
        self.check_index(index)?;
        self.todos[index].mark_undone();
        Ok(())
    }

    pub fn mark_all_done(&mut self) {
        for todo in &mut self.todos {
            todo.mark_done();
        }
    }

    pub fn mark_all_undone(&mut self) {
        for todo in &mut self.todos {
            todo.mark_undone();
        }
    }

    /// True iff the list is non-empty and every todo is done. An empty
    /// list is never done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(Todo::is_done)
    }

    /// The contained todos in insertion order.
    pub fn all_todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Direct replace; no validation.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Rebuilds the id counter as max-seen-id + 1. Must run after
    /// deserializing so a live id is never handed out twice.
    pub fn reseed(&mut self) {
        let max = self.todos.iter().map(|todo| todo.id).max().unwrap_or(0);
        self.next_todo_id = self.next_todo_id.max(max + 1);
    }

    fn check_index(&self, index: usize) -> Result<(), OutOfRange> {
        if index < self.todos.len() {
            Ok(())
        } else {
            Err(OutOfRange {
                index,
                len: self.todos.len(),
            })
        }
    }
}

/// The session-scoped collection of todo lists.
///
/// List ids are unique within one set and come from a monotonic counter.
/// Like the per-list todo counter, it is not serialized: callers restoring
/// a set from storage must call [`reseed`](Self::reseed) before creating
/// anything new.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoSet {
    lists: Vec<TodoList>,
    #[serde(skip)]
    next_list_id: u64,
}

impl TodoSet {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            next_list_id: 1,
        }
    }

    /// Creates an empty list with a fresh id and returns the id.
    pub fn create_list(&mut self, title: impl Into<String>) -> u64 {
        let id = self.next_list_id;
        self.next_list_id += 1;
        self.lists.push(TodoList::new(id, title));
        id
    }

    /// Removes and returns the list with the given id, or `None`.
    pub fn remove_list(&mut self, id: u64) -> Option<TodoList> {
        let index = self.lists.iter().position(|list| list.id == id)?;
        Some(self.lists.remove(index))
    }

    pub fn find_list(&self, id: u64) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn find_list_mut(&mut self, id: u64) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|list| list.id == id)
    }

    /// The lists in creation order.
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    /// Creates a todo in the given list, returning its id, or `None` when
    /// no list has that id.
    pub fn create_todo(&mut self, list_id: u64, title: impl Into<String>) -> Option<u64> {
        Some(self.find_list_mut(list_id)?.create_todo(title))
    }

    /// Recomputes every id counter as max-seen-id + 1, recursively into
    /// each list. Run once after deserializing.
    pub fn reseed(&mut self) {
        let max = self.lists.iter().map(|list| list.id).max().unwrap_or(0);
        self.next_list_id = self.next_list_id.max(max + 1);

        for list in &mut self.lists {
            list.reseed();
        }
    }
}

impl Default for TodoSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groceries() -> TodoList {
        let mut list = TodoList::new(5, "Groceries");
        list.create_todo("Milk");
        list.create_todo("Eggs");
        list.create_todo("Bread");
        list
    }

    #[test]
    fn empty_list_is_never_done() {
        let list = TodoList::new(1, "Empty");
        assert_eq!(list.size(), 0);
        assert!(!list.is_done());
        assert!(list.first().is_none());
        assert!(list.last().is_none());
    }

    #[test]
    fn done_iff_nonempty_and_all_todos_done() {
        let mut list = groceries();
        assert!(!list.is_done());

        list.mark_all_done();
        assert!(list.is_done());

        list.mark_undone_at(1).unwrap();
        assert!(!list.is_done());

        list.mark_done_at(1).unwrap();
        assert!(list.is_done());

        list.mark_all_undone();
        assert!(list.all_todos().iter().all(|todo| !todo.is_done()));
    }

    #[test]
    fn add_preserves_insertion_order() {
        let list = groceries();
        let titles: Vec<_> = list.all_todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Milk", "Eggs", "Bread"]);
        assert_eq!(list.first().unwrap().title, "Milk");
        assert_eq!(list.last().unwrap().title, "Bread");
    }

    #[test]
    fn create_todo_assigns_fresh_sequential_ids() {
        let mut list = TodoList::new(1, "Chores");
        assert_eq!(list.create_todo("Sweep"), 1);
        assert_eq!(list.create_todo("Mop"), 2);
    }

    #[test]
    fn remove_at_removes_exactly_one() {
        let mut list = groceries();
        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.title, "Eggs");
        assert_eq!(list.size(), 2);
        assert!(list.find_by_id(removed.id).is_none());
    }

    #[test]
    fn positional_ops_fail_out_of_range() {
        let mut list = groceries();
        let len = list.size();

        assert_eq!(list.remove_at(len), Err(OutOfRange { index: len, len }));
        assert_eq!(list.mark_done_at(17), Err(OutOfRange { index: 17, len }));
        assert_eq!(list.mark_undone_at(len), Err(OutOfRange { index: len, len }));
        assert_eq!(list.size(), len);
    }

    #[test]
    fn lookups_return_none_for_missing() {
        let list = groceries();
        assert!(list.find_by_id(99).is_none());

        let stranger = Todo::new(99, "Not here");
        assert!(list.find_index_of(&stranger).is_none());

        let second = list.all_todos()[1].clone();
        assert_eq!(list.find_index_of(&second), Some(1));
    }

    #[test]
    fn set_title_replaces_unconditionally() {
        let mut list = groceries();
        list.set_title("");
        assert_eq!(list.title, "");
    }

    #[test]
    fn id_not_reused_after_remove_then_create() {
        let mut list = groceries();
        list.remove_at(2).unwrap();
        assert_eq!(list.create_todo("Butter"), 4);
    }

    #[test]
    fn add_bumps_counter_past_foreign_ids() {
        let mut list = TodoList::new(1, "Chores");
        list.add(Todo::new(7, "Imported"));
        assert_eq!(list.create_todo("Fresh"), 8);
    }

    #[test]
    fn set_creates_finds_and_removes_lists() {
        let mut set = TodoSet::new();
        let a = set.create_list("Alpha");
        let b = set.create_list("Beta");
        assert_ne!(a, b);
        assert_eq!(set.lists().len(), 2);

        assert_eq!(set.find_list(a).unwrap().title, "Alpha");
        assert!(set.find_list(99).is_none());

        let removed = set.remove_list(a).unwrap();
        assert_eq!(removed.title, "Alpha");
        assert!(set.remove_list(a).is_none());
        assert_eq!(set.lists().len(), 1);
    }

    #[test]
    fn set_never_reuses_a_list_id() {
        let mut set = TodoSet::new();
        let a = set.create_list("Alpha");
        let b = set.create_list("Beta");
        set.remove_list(b).unwrap();
        let c = set.create_list("Gamma");
        assert!(c > b);
        assert_ne!(c, a);
    }

    #[test]
    fn set_create_todo_targets_the_right_list() {
        let mut set = TodoSet::new();
        let a = set.create_list("Alpha");
        let id = set.create_todo(a, "First").unwrap();
        assert_eq!(set.find_list(a).unwrap().find_by_id(id).unwrap().title, "First");
        assert!(set.create_todo(99, "Nowhere").is_none());
    }

    #[test]
    fn deserialization_round_trips_ids_and_done_flags() {
        let source = r#"(
            id: 5,
            title: "Groceries",
            todos: [
                (id: 1, title: "Milk", done: true),
                (id: 2, title: "Eggs", done: false),
            ],
        )"#;

        let mut list: TodoList = ron::from_str(source).unwrap();
        list.reseed();

        assert_eq!(list.id, 5);
        assert_eq!(list.title, "Groceries");
        assert!(list.find_by_id(1).unwrap().is_done());
        assert!(!list.find_by_id(2).unwrap().is_done());

        // Counter reseeds above the max persisted id.
        assert_eq!(list.create_todo("Bread"), 3);
    }

    #[test]
    fn serialize_then_deserialize_is_lossless() {
        let mut set = TodoSet::new();
        let a = set.create_list("Groceries");
        let milk = set.create_todo(a, "Milk").unwrap();
        set.create_todo(a, "Eggs").unwrap();
        set.find_list_mut(a)
            .unwrap()
            .find_by_id_mut(milk)
            .unwrap()
            .mark_done();

        let text = ron::to_string(&set).unwrap();
        let mut restored: TodoSet = ron::from_str(&text).unwrap();
        restored.reseed();

        let list = restored.find_list(a).unwrap();
        assert_eq!(list.title, "Groceries");
        assert!(list.find_by_id(milk).unwrap().is_done());
        assert_eq!(list.size(), 2);

        // Fresh ids stay above everything restored.
        let next = restored.create_list("New");
        assert!(next > a);
    }
}

use super::{Todo, TodoList};

/// Display-ordering capability: anything with a title and a done flag.
/// Both [`Todo`] and [`TodoList`] implement it, so one sorter covers the
/// list-of-lists page and the todos inside a single list.
pub trait Sortable {
    fn title(&self) -> &str;
    fn is_done(&self) -> bool;
}

impl Sortable for Todo {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

impl Sortable for TodoList {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_done(&self) -> bool {
        TodoList::is_done(self)
    }
}

/// Returns a new sequence ordered for display: everything not done first,
/// then everything done, each partition in ascending case-insensitive
/// title order. Stable, and the input is never mutated.
pub fn sort_by_status_and_title<T: Sortable + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        a.is_done()
            .cmp(&b.is_done())
            .then_with(|| a.title().to_lowercase().cmp(&b.title().to_lowercase()))
    });
    sorted
}

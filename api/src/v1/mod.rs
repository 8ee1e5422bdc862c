mod list;
mod sort;
mod todo;

pub use list::{OutOfRange, TodoList, TodoSet};
pub use sort::{sort_by_status_and_title, Sortable};
pub use todo::Todo;

use todos_api::v1::TodoSet;

/// Sample lists installed into fresh sessions when the server runs with
/// `--seed`; also a handy test fixture.
pub fn sample_todos() -> TodoSet {
    let mut todos = TodoSet::new();

    let work = todos.create_list("Work Todos");
    add(&mut todos, work, "Get coffee", true);
    add(&mut todos, work, "Chat with co-workers", true);
    add(&mut todos, work, "Duck out of meeting", false);

    let home = todos.create_list("Home Todos");
    add(&mut todos, home, "Feed the cats", true);
    add(&mut todos, home, "Go to bed", true);
    add(&mut todos, home, "Buy milk", true);
    add(&mut todos, home, "Study for Launch School", true);

    todos.create_list("Additional Todos");

    let social = todos.create_list("social todos");
    add(&mut todos, social, "Go to Libby's birthday party", false);

    todos
}

fn add(todos: &mut TodoSet, list_id: u64, title: &str, done: bool) {
    let Some(id) = todos.create_todo(list_id, title) else {
        return;
    };

    if done {
        if let Some(todo) = todos
            .find_list_mut(list_id)
            .and_then(|list| list.find_by_id_mut(id))
        {
            todo.mark_done();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_covers_done_undone_and_empty_lists() {
        let todos = sample_todos();
        assert_eq!(todos.lists().len(), 4);

        let by_title = |title: &str| {
            todos
                .lists()
                .iter()
                .find(|list| list.title == title)
                .unwrap()
        };

        assert!(!by_title("Work Todos").is_done());
        assert!(by_title("Home Todos").is_done());
        assert!(!by_title("Additional Todos").is_done());
        assert_eq!(by_title("Additional Todos").size(), 0);
        assert!(!by_title("social todos").is_done());
    }
}

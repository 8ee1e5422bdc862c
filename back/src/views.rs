//! Server-rendered pages. Plain HTML builders; user-supplied titles are
//! escaped before they reach the page.

use std::fmt::Write;

use axum::response::Html;
use todos_api::v1::{Todo, TodoList};

use crate::session::Flash;

pub fn list_index(lists: &[TodoList], flashes: &[Flash]) -> Html<String> {
    let mut body = String::new();

    body.push_str("<h1>Todo Lists</h1>\n");
    body.push_str("<p><a href=\"/lists/new\">New list</a></p>\n");

    if lists.is_empty() {
        body.push_str("<p>You have no todo lists yet.</p>\n");
    } else {
        body.push_str("<ul class=\"lists\">\n");
        for list in lists {
            let done = list.all_todos().iter().filter(|todo| todo.is_done()).count();
            let _ = write!(
                body,
                "<li class=\"{}\"><a href=\"/lists/{}\">{}</a> <span>{} / {} done</span></li>\n",
                done_class(list.is_done()),
                list.id,
                escape(&list.title),
                done,
                list.size(),
            );
        }
        body.push_str("</ul>\n");
    }

    layout("Todo Lists", flashes, &body)
}

pub fn new_list(pending_title: &str, error: Option<&str>) -> Html<String> {
    let mut body = String::new();

    body.push_str("<h1>New Todo List</h1>\n");
    push_error(&mut body, error);

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/lists\">\n\
         <label for=\"todoListTitle\">Title</label>\n\
         <input type=\"text\" id=\"todoListTitle\" name=\"todoListTitle\" value=\"{}\">\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n\
         <p><a href=\"/lists\">Back to lists</a></p>\n",
        escape(pending_title),
    );

    layout("New Todo List", &[], &body)
}

pub fn show_list(
    list: &TodoList,
    todos: &[Todo],
    flashes: &[Flash],
    pending_title: &str,
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::new();

    let _ = write!(body, "<h1>{}</h1>\n", escape(&list.title));
    let _ = write!(
        body,
        "<p><a href=\"/lists\">All lists</a> | <a href=\"/lists/{}/edit\">Edit list</a></p>\n",
        list.id,
    );
    push_error(&mut body, error);

    if todos.is_empty() {
        body.push_str("<p>This list is empty.</p>\n");
    } else {
        body.push_str("<ul class=\"todos\">\n");
        for todo in todos {
            let _ = write!(
                body,
                "<li class=\"{}\">\n\
                 <form method=\"post\" action=\"/lists/{list_id}/todos/{todo_id}/toggle\">\
                 <button type=\"submit\">{mark}</button></form>\n\
                 <span>{title}</span>\n\
                 <form method=\"post\" action=\"/lists/{list_id}/todos/{todo_id}/destroy\">\
                 <button type=\"submit\">Delete</button></form>\n\
                 </li>\n",
                done_class(todo.is_done()),
                list_id = list.id,
                todo_id = todo.id,
                mark = if todo.is_done() { "Undo" } else { "Done" },
                title = escape(&todo.title),
            );
        }
        body.push_str("</ul>\n");

        let _ = write!(
            body,
            "<form method=\"post\" action=\"/lists/{}/complete_all\">\
             <button type=\"submit\">Complete all</button></form>\n",
            list.id,
        );
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/lists/{}/todos\">\n\
         <label for=\"todoTitle\">New todo</label>\n\
         <input type=\"text\" id=\"todoTitle\" name=\"todoTitle\" value=\"{}\">\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
        list.id,
        escape(pending_title),
    );

    layout(&list.title, flashes, &body)
}

pub fn edit_list(list: &TodoList, pending_title: &str, error: Option<&str>) -> Html<String> {
    let mut body = String::new();

    let _ = write!(body, "<h1>Edit {}</h1>\n", escape(&list.title));
    push_error(&mut body, error);

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/lists/{id}/edit\">\n\
         <label for=\"todoListTitle\">New title</label>\n\
         <input type=\"text\" id=\"todoListTitle\" name=\"todoListTitle\" value=\"{}\">\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <form method=\"post\" action=\"/lists/{id}/destroy\">\
         <button type=\"submit\">Delete list</button></form>\n\
         <p><a href=\"/lists/{id}\">Back to list</a></p>\n",
        escape(pending_title),
        id = list.id,
    );

    layout("Edit Todo List", &[], &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Not Found",
        &[],
        "<h1>Not Found</h1>\n<p>That list or todo does not exist.</p>\n\
         <p><a href=\"/lists\">Back to lists</a></p>\n",
    )
}

fn layout(title: &str, flashes: &[Flash], body: &str) -> Html<String> {
    let mut page = String::new();

    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Todos</title>\n</head>\n<body>\n",
        escape(title),
    );

    for flash in flashes {
        let (class, text) = match flash {
            Flash::Success(text) => ("flash success", text),
            Flash::Error(text) => ("flash error", text),
        };
        let _ = write!(page, "<p class=\"{}\">{}</p>\n", class, escape(text));
    }

    page.push_str(body);
    page.push_str("</body>\n</html>\n");

    Html(page)
}

fn push_error(body: &mut String, error: Option<&str>) {
    if let Some(error) = error {
        let _ = write!(body, "<p class=\"flash error\">{}</p>\n", escape(error));
    }
}

fn done_class(done: bool) -> &'static str {
    if done {
        "done"
    } else {
        "pending"
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

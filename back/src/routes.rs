use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use todos_api::v1::{sort_by_status_and_title, OutOfRange, TodoList};
use tracing::{error, info};

use crate::{
    session::{Flash, SessionId},
    views, AppState,
};

const MAX_TITLE_LEN: usize = 100;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/lists", get(list_index).post(create_list))
        .route("/lists/new", get(new_list_form))
        .route("/lists/:id", get(show_list))
        .route("/lists/:id/edit", get(edit_list_form).post(rename_list))
        .route("/lists/:id/destroy", post(destroy_list))
        .route("/lists/:id/todos", post(create_todo))
        .route("/lists/:id/todos/:todo_id/toggle", post(toggle_todo))
        .route("/lists/:id/todos/:todo_id/destroy", post(destroy_todo))
        .route("/lists/:id/complete_all", post(complete_all))
}

async fn home() -> Redirect {
    Redirect::to("/lists")
}

async fn list_index(State(state): State<Arc<AppState>>, sid: SessionId) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let lists = sort_by_status_and_title(session.todos.lists());
    let flashes = session.take_flashes();

    sid.apply(views::list_index(&lists, &flashes).into_response())
}

async fn new_list_form() -> Response {
    views::new_list("", None).into_response()
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Form(form): Form<ListTitleForm>,
) -> Response {
    let title = form.title.trim().to_owned();

    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    if let Some(error) = list_title_error(&title, session.todos.lists(), None) {
        return sid.apply(views::new_list(&title, Some(&error)).into_response());
    }

    let id = session.todos.create_list(title.clone());
    session.flash(Flash::Success("The list has been created.".into()));

    info!(id, title = %title, "created list");

    sid.apply(Redirect::to("/lists").into_response())
}

async fn show_list(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(id): Path<u64>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list(id).cloned() else {
        return not_found(sid);
    };

    let todos = sort_by_status_and_title(list.all_todos());
    let flashes = session.take_flashes();

    sid.apply(views::show_list(&list, &todos, &flashes, "", None).into_response())
}

async fn edit_list_form(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(id): Path<u64>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list(id).cloned() else {
        return not_found(sid);
    };

    sid.apply(views::edit_list(&list, &list.title, None).into_response())
}

async fn rename_list(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(id): Path<u64>,
    Form(form): Form<ListTitleForm>,
) -> Response {
    let title = form.title.trim().to_owned();

    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list(id).cloned() else {
        return not_found(sid);
    };

    if let Some(error) = list_title_error(&title, session.todos.lists(), Some(id)) {
        return sid.apply(views::edit_list(&list, &title, Some(&error)).into_response());
    }

    if let Some(list) = session.todos.find_list_mut(id) {
        list.set_title(title.clone());
    }
    session.flash(Flash::Success("The list has been renamed.".into()));

    info!(id, title = %title, "renamed list");

    sid.apply(Redirect::to(&format!("/lists/{id}")).into_response())
}

async fn destroy_list(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(id): Path<u64>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.remove_list(id) else {
        return not_found(sid);
    };

    session.flash(Flash::Success("The list has been deleted.".into()));

    info!(id, title = %list.title, "deleted list");

    sid.apply(Redirect::to("/lists").into_response())
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(id): Path<u64>,
    Form(form): Form<TodoTitleForm>,
) -> Response {
    let title = form.title.trim().to_owned();

    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list(id).cloned() else {
        return not_found(sid);
    };

    if let Some(error) = todo_title_error(&title) {
        let todos = sort_by_status_and_title(list.all_todos());
        let flashes = session.take_flashes();
        return sid
            .apply(views::show_list(&list, &todos, &flashes, &title, Some(&error)).into_response());
    }

    if let Some(todo_id) = session.todos.create_todo(id, title.clone()) {
        session.flash(Flash::Success("The todo has been created.".into()));
        info!(list_id = id, todo_id, title = %title, "created todo");
    }

    sid.apply(Redirect::to(&format!("/lists/{id}")).into_response())
}

async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path((list_id, todo_id)): Path<(u64, u64)>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list_mut(list_id) else {
        return not_found(sid);
    };
    let Some(todo) = list.find_by_id(todo_id).cloned() else {
        return not_found(sid);
    };
    let Some(index) = list.find_index_of(&todo) else {
        return not_found(sid);
    };

    let result = if todo.is_done() {
        list.mark_undone_at(index)
    } else {
        list.mark_done_at(index)
    };
    if let Err(err) = result {
        return internal_error(err);
    }

    let message = if todo.is_done() {
        format!("\"{}\" marked as NOT done!", todo.title)
    } else {
        format!("\"{}\" marked done.", todo.title)
    };
    session.flash(Flash::Success(message));

    info!(list_id, todo_id, done = !todo.is_done(), "toggled todo");

    sid.apply(Redirect::to(&format!("/lists/{list_id}")).into_response())
}

async fn destroy_todo(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path((list_id, todo_id)): Path<(u64, u64)>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list_mut(list_id) else {
        return not_found(sid);
    };
    let Some(todo) = list.find_by_id(todo_id).cloned() else {
        return not_found(sid);
    };
    let Some(index) = list.find_index_of(&todo) else {
        return not_found(sid);
    };

    match list.remove_at(index) {
        Ok(removed) => {
            session.flash(Flash::Success("The todo has been deleted.".into()));
            info!(list_id, todo_id, title = %removed.title, "deleted todo");
            sid.apply(Redirect::to(&format!("/lists/{list_id}")).into_response())
        }
        Err(err) => internal_error(err),
    }
}

async fn complete_all(
    State(state): State<Arc<AppState>>,
    sid: SessionId,
    Path(list_id): Path<u64>,
) -> Response {
    let mut sessions = state.sessions.lock().await;
    let session = state.session(&mut sessions, sid.id);

    let Some(list) = session.todos.find_list_mut(list_id) else {
        return not_found(sid);
    };

    list.mark_all_done();
    session.flash(Flash::Success("All todos have been marked as done.".into()));

    info!(list_id, "marked all todos done");

    sid.apply(Redirect::to(&format!("/lists/{list_id}")).into_response())
}

fn not_found(sid: SessionId) -> Response {
    sid.apply((StatusCode::NOT_FOUND, views::not_found()).into_response())
}

/// An out-of-range index here means a stale position, a programming error
/// scoped to this request; it aborts the request, never the process.
fn internal_error(err: OutOfRange) -> Response {
    error!(%err, "positional todo operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

#[derive(Deserialize)]
struct ListTitleForm {
    #[serde(rename = "todoListTitle", default)]
    title: String,
}

#[derive(Deserialize)]
struct TodoTitleForm {
    #[serde(rename = "todoTitle", default)]
    title: String,
}

fn list_title_error(title: &str, lists: &[TodoList], except: Option<u64>) -> Option<String> {
    if title.is_empty() {
        Some("A title was not provided".into())
    } else if title.chars().count() > MAX_TITLE_LEN {
        Some("List title must be between 1 and 100 characters.".into())
    } else if lists
        .iter()
        .any(|list| list.title == title && Some(list.id) != except)
    {
        Some("List title must be unique.".into())
    } else {
        None
    }
}

fn todo_title_error(title: &str) -> Option<String> {
    if title.is_empty() {
        Some("A title was not provided".into())
    } else if title.chars().count() > MAX_TITLE_LEN {
        Some("Todo title must be between 1 and 100 characters.".into())
    } else {
        None
    }
}

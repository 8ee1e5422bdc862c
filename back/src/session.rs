use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::Response,
};
use serde::{Deserialize, Serialize};
use todos_api::v1::TodoSet;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// One user's state: their todo lists plus any flash messages queued for
/// the next rendered page. Flashes are transient and never persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Session {
    pub todos: TodoSet,
    #[serde(skip)]
    flashes: Vec<Flash>,
}

impl Session {
    pub fn with_todos(todos: TodoSet) -> Self {
        Self {
            todos,
            flashes: Vec::new(),
        }
    }

    pub fn flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }

    /// Drains the queued flashes; called once per rendered page.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// The requester's session identity, read from the `sid` cookie or minted
/// fresh when the cookie is missing or unparseable.
#[derive(Clone, Copy, Debug)]
pub struct SessionId {
    pub id: Uuid,
    pub is_new: bool,
}

impl SessionId {
    /// Attaches the `Set-Cookie` header when this request minted a new
    /// session id.
    pub fn apply(&self, mut response: Response) -> Response {
        if !self.is_new {
            return response;
        }

        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }

        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match session_id(&parts.headers) {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
        })
    }
}

/// Parses the session id out of the `Cookie` header, if present and valid.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            value.parse().ok()
        } else {
            None
        }
    })
}

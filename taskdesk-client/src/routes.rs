/// Client views and navigation guards

use std::{fmt, str::FromStr};

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Root,
    Login,
    Register,
    Tasks,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Root => "/",
            View::Login => "/login",
            View::Register => "/register",
            View::Tasks => "/tasks",
        }
    }

    /// Whether the view needs a logged-in session
    pub fn is_protected(&self) -> bool {
        matches!(self, View::Tasks)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/" | "" => Ok(View::Root),
            "/login" => Ok(View::Login),
            "/register" => Ok(View::Register),
            "/tasks" => Ok(View::Tasks),
            other => Err(format!("Unknown view: {}", other)),
        }
    }
}

/// The view actually shown when `requested` is asked for
///
/// The root always lands on the login view, and protected views do too
/// while the session holds no token.
pub fn resolve(requested: View, session: &Session) -> View {
    match requested {
        View::Root => View::Login,
        view if view.is_protected() && !session.is_authenticated() => View::Login,
        view => view,
    }
}

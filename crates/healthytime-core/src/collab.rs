//! Seams to the collaborators the core drives but does not own:
//! screen navigation and image selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Navigation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    /// Tab container holding the screens below.
    Main,
    Home,
    Record,
    Graph,
    History,
    User,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Main,
        Route::Home,
        Route::Record,
        Route::Graph,
        Route::History,
        Route::User,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Main => "main",
            Route::Home => "home",
            Route::Record => "record",
            Route::Graph => "graph",
            Route::History => "history",
            Route::User => "user",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Route::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownRoute(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "route", rename_all = "lowercase")]
pub enum NavCommand {
    Navigate(Route),
    Replace(Route),
}

pub trait Navigator {
    fn dispatch(&mut self, command: NavCommand);
}

/// Completes sign-in by replacing the login route with the main tabs.
///
/// Credentials are not checked; there is no auth backend.
pub fn sign_in<N: Navigator + ?Sized>(navigator: &mut N) {
    tracing::info!("signed in");
    navigator.dispatch(NavCommand::Replace(Route::Main));
}

/// Minimal stack navigator: navigate pushes, replace swaps the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    stack: Vec<Route>,
}

impl NavigationStack {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        // The stack is never empty: it starts with one route and replace
        // swaps rather than pops.
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pop back one screen. The root route stays.
    pub fn back(&mut self) -> Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Navigator for NavigationStack {
    fn dispatch(&mut self, command: NavCommand) {
        tracing::debug!(?command, "navigation");
        match command {
            NavCommand::Navigate(route) => {
                if self.current() != route {
                    self.stack.push(route);
                }
            }
            NavCommand::Replace(route) => {
                self.stack.pop();
                self.stack.push(route);
            }
        }
    }
}

// ── Image selection ─────────────────────────────────────────────────

/// What the core asks the image picker for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub allows_editing: bool,
    /// Crop aspect as (width, height).
    pub aspect: (u32, u32),
    /// 0.0 ..= 1.0 compression quality.
    pub quality: f32,
}

impl Default for ImageRequest {
    fn default() -> Self {
        Self {
            allows_editing: true,
            aspect: (4, 3),
            quality: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "uri", rename_all = "lowercase")]
pub enum PickOutcome {
    Cancelled,
    /// Reference to the chosen image, stored verbatim.
    Picked(String),
}

pub trait ImagePicker {
    fn pick(&mut self, request: &ImageRequest) -> PickOutcome;
}

//! Search session
//!
//! One search widget's lifecycle: debounced input, generation-guarded
//! rendering, keyboard navigation and blur handling. All state lives here
//! and is published as [`Dropdown`] snapshots; nothing is read back from
//! the view.
//!
//! Methods that schedule work spawn tokio tasks and must be called from
//! within a runtime.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::search::{
    default_suggestions, Dropdown, DropdownOption, Key, KeyOutcome, SearchEngine, Suggestion,
};

// == Session Config ==
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period after the last keystroke before a query fires
    pub debounce: Duration,
    /// Delay between losing focus and closing, so clicks on options land
    pub blur_grace: Duration,
    /// Shown while the input is empty
    pub suggestions: Vec<Suggestion>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(150),
            suggestions: default_suggestions(),
        }
    }
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search_debounce_ms),
            blur_grace: Duration::from_millis(config.search_blur_grace_ms),
            ..Self::default()
        }
    }
}

/// State shared with the session's timer tasks.
#[derive(Debug, Default)]
struct SessionState {
    input: String,
    /// Bumped on every new query, dismissal or disposal
    generation: u64,
    pointer_over: bool,
}

// == Search Session ==
pub struct SearchSession {
    engine: Arc<SearchEngine>,
    config: SessionConfig,
    state: Arc<Mutex<SessionState>>,
    view: Arc<watch::Sender<Dropdown>>,
    pending: Option<JoinHandle<()>>,
    blur: Option<JoinHandle<()>>,
}

impl SearchSession {
    pub fn new(engine: Arc<SearchEngine>, config: SessionConfig) -> Self {
        let (view, _) = watch::channel(Dropdown::Hidden);
        Self {
            engine,
            config,
            state: Arc::new(Mutex::new(SessionState::default())),
            view: Arc::new(view),
            pending: None,
            blur: None,
        }
    }

    // == Observation ==
    /// Current dropdown.
    pub fn dropdown(&self) -> Dropdown {
        self.view.borrow().clone()
    }

    /// Receiver notified on every dropdown change.
    pub fn subscribe(&self) -> watch::Receiver<Dropdown> {
        self.view.subscribe()
    }

    pub fn input_text(&self) -> String {
        self.state.lock().input.clone()
    }

    // == Input ==
    /// Records new input text and restarts the debounce timer.
    ///
    /// Only the last call inside the debounce window reaches the engine. The
    /// previous query, whether still waiting or already in flight, is
    /// cancelled and its result can no longer render.
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        let generation = {
            let mut state = self.state.lock();
            state.input = text.clone();
            state.generation += 1;
            state.generation
        };
        self.cancel_pending();

        let engine = self.engine.clone();
        let state = self.state.clone();
        let view = self.view.clone();
        let debounce = self.config.debounce;
        let suggestions = self.config.suggestions.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let query = text.trim().to_string();
            if query.is_empty() {
                publish_if_current(&state, &view, generation, Dropdown::suggestions(suggestions));
                return;
            }

            publish_if_current(
                &state,
                &view,
                generation,
                Dropdown::Loading {
                    query: query.clone(),
                },
            );

            let next = match engine.search(&query).await {
                Ok(outcome) if outcome.is_empty() => Dropdown::Empty { query },
                Ok(outcome) => Dropdown::Results {
                    query,
                    groups: outcome.groups,
                    active: None,
                },
                Err(err) => {
                    warn!(%err, query = %query, "Search failed");
                    Dropdown::Error {
                        query,
                        message: err.user_message(),
                    }
                }
            };

            publish_if_current(&state, &view, generation, next);
        }));
    }

    // == Focus ==
    /// Input gained focus: cancels a pending blur and reopens the dropdown.
    pub fn focus(&mut self) {
        if let Some(handle) = self.blur.take() {
            handle.abort();
        }

        let input = self.input_text();
        if input.trim().is_empty() {
            let generation = self.bump_generation();
            publish_if_current(
                &self.state,
                &self.view,
                generation,
                Dropdown::suggestions(self.config.suggestions.clone()),
            );
        } else if !self.view.borrow().is_visible() {
            self.input(input);
        }
    }

    /// Input lost focus: closes after the grace delay unless the pointer
    /// is over the dropdown by then.
    pub fn blur(&mut self) {
        if let Some(handle) = self.blur.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let view = self.view.clone();
        let grace = self.config.blur_grace;

        self.blur = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;

            let mut state = state.lock();
            if state.pointer_over {
                debug!("Blur ignored, pointer over dropdown");
                return;
            }
            state.generation += 1;
            view.send_replace(Dropdown::Hidden);
        }));
    }

    pub fn set_pointer_over(&mut self, over: bool) {
        self.state.lock().pointer_over = over;
    }

    // == Keyboard ==
    pub fn key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ArrowDown | Key::ArrowUp => {
                if self.view.borrow().option_count() == 0 {
                    return KeyOutcome::Ignored;
                }
                let mut moved = None;
                self.view
                    .send_modify(|dropdown| moved = dropdown.move_active(key == Key::ArrowDown));
                KeyOutcome::Moved(moved)
            }
            Key::Enter => {
                let active = self.view.borrow().active();
                match active {
                    Some(index) => self.select(index),
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Tab => {
                let query = match self.view.borrow().active_option() {
                    Some(DropdownOption::Suggestion(suggestion)) => Some(suggestion.query.clone()),
                    _ => None,
                };
                match query {
                    Some(query) => self.fill(query),
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Escape => {
                self.close();
                KeyOutcome::Dismissed
            }
            Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Activates row `index`, as a click or Enter would.
    pub fn select(&mut self, index: usize) -> KeyOutcome {
        enum Choice {
            Navigate(crate::search::SearchTarget),
            Fill(String),
        }

        let choice = match self.view.borrow().option_at(index) {
            Some(DropdownOption::Result(result)) => Some(Choice::Navigate(result.target())),
            Some(DropdownOption::Suggestion(suggestion)) => Some(Choice::Fill(suggestion.query.clone())),
            None => None,
        };

        match choice {
            Some(Choice::Navigate(target)) => {
                self.close();
                KeyOutcome::Navigate(target)
            }
            Some(Choice::Fill(query)) => self.fill(query),
            None => KeyOutcome::Ignored,
        }
    }

    fn fill(&mut self, query: String) -> KeyOutcome {
        self.input(query.clone());
        KeyOutcome::Filled(query)
    }

    // == Lifecycle ==
    /// Closes the dropdown and drops any pending or in-flight query.
    pub fn close(&mut self) {
        self.cancel_pending();
        if let Some(handle) = self.blur.take() {
            handle.abort();
        }
        self.bump_generation();
        self.view.send_replace(Dropdown::Hidden);
    }

    /// Tears the session down. The session stays usable but idle.
    pub fn dispose(&mut self) {
        self.close();
        let mut state = self.state.lock();
        state.input.clear();
        state.pointer_over = false;
    }

    fn bump_generation(&self) -> u64 {
        let mut state = self.state.lock();
        state.generation += 1;
        state.generation
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel_pending();
        if let Some(handle) = self.blur.take() {
            handle.abort();
        }
    }
}

/// Publishes `next` only if no newer query or dismissal happened since
/// `generation` was issued.
fn publish_if_current(
    state: &Mutex<SessionState>,
    view: &watch::Sender<Dropdown>,
    generation: u64,
    next: Dropdown,
) -> bool {
    let state = state.lock();
    if state.generation != generation {
        debug!(generation, current = state.generation, "Discarding stale search result");
        return false;
    }
    view.send_replace(next);
    true
}

//! Search Module
//!
//! Debounced autocomplete over patients, professionals and anamneses.
//!
//! Flow: keystroke → [`SearchSession`] debounce → [`SearchEngine`]
//! (result cache, parallel fetch, matching) → [`Dropdown`] snapshot.

mod category;
mod engine;
mod matcher;
mod session;
mod source;
mod view;

pub use category::{QueryPlan, SearchCategory};
pub use engine::{SearchEngine, SearchOutcome};
pub use matcher::{
    build_groups, match_record, Highlight, ResultGroup, SearchResult, SearchTarget, SlotLimits,
};
pub use session::{SearchSession, SessionConfig};
pub use source::{RecordSource, ResourceSource};
pub use view::{default_suggestions, Dropdown, DropdownOption, Key, KeyOutcome, Suggestion};

pub(crate) use matcher::find_case_insensitive;

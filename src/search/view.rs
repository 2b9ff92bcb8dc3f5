//! Dropdown state
//!
//! What the search widget shows. The session owns one `Dropdown` and
//! publishes every change; a renderer only ever projects it.

use serde::Serialize;

use crate::search::{ResultGroup, SearchResult};

// == Suggestion ==
/// Static entry shown while the input is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    /// Text placed in the input when chosen
    pub query: String,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
        }
    }
}

/// Suggestions shown before the user types anything.
pub fn default_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new("Buscar pacientes por nome ou CPF", "paciente "),
        Suggestion::new("Buscar profissionais", "profissional "),
        Suggestion::new("Buscar anamneses", "anamnese "),
    ]
}

// == Dropdown ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Dropdown {
    Hidden,
    Suggestions {
        items: Vec<Suggestion>,
        active: Option<usize>,
    },
    Loading {
        query: String,
    },
    Results {
        query: String,
        groups: Vec<ResultGroup>,
        active: Option<usize>,
    },
    Empty {
        query: String,
    },
    Error {
        query: String,
        message: String,
    },
}

/// A selectable row of the dropdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropdownOption<'a> {
    Suggestion(&'a Suggestion),
    Result(&'a SearchResult),
}

impl Dropdown {
    pub fn suggestions(items: Vec<Suggestion>) -> Self {
        Dropdown::Suggestions { items, active: None }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Dropdown::Hidden)
    }

    /// Number of selectable rows.
    pub fn option_count(&self) -> usize {
        match self {
            Dropdown::Suggestions { items, .. } => items.len(),
            Dropdown::Results { groups, .. } => groups.iter().map(|g| g.items.len()).sum(),
            _ => 0,
        }
    }

    pub fn active(&self) -> Option<usize> {
        match self {
            Dropdown::Suggestions { active, .. } | Dropdown::Results { active, .. } => *active,
            _ => None,
        }
    }

    /// Row at `index`, counting result rows across groups in display order.
    pub fn option_at(&self, index: usize) -> Option<DropdownOption<'_>> {
        match self {
            Dropdown::Suggestions { items, .. } => items.get(index).map(DropdownOption::Suggestion),
            Dropdown::Results { groups, .. } => groups
                .iter()
                .flat_map(|g| g.items.iter())
                .nth(index)
                .map(DropdownOption::Result),
            _ => None,
        }
    }

    pub fn active_option(&self) -> Option<DropdownOption<'_>> {
        self.active().and_then(|index| self.option_at(index))
    }

    /// Moves the highlight down (`forward`) or up, wrapping at either end.
    ///
    /// With nothing highlighted, down selects the first row and up the last.
    pub fn move_active(&mut self, forward: bool) -> Option<usize> {
        let count = self.option_count();
        let next = match (self.active(), count) {
            (_, 0) => None,
            (None, _) if forward => Some(0),
            (None, _) => Some(count - 1),
            (Some(i), _) if forward => Some((i + 1) % count),
            (Some(i), _) => Some((i + count - 1) % count),
        };

        match self {
            Dropdown::Suggestions { active, .. } | Dropdown::Results { active, .. } => {
                *active = next;
            }
            _ => {}
        }
        next
    }
}

// == Keys ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Tab,
    Other,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing to do; the caller keeps default behavior
    Ignored,
    /// Highlight moved to this row
    Moved(Option<usize>),
    /// A result was activated
    Navigate(crate::search::SearchTarget),
    /// The input was filled with this text and a search scheduled
    Filled(String),
    /// The dropdown was closed and the input blurred
    Dismissed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_active_wraps() {
        let mut dropdown = Dropdown::suggestions(default_suggestions());

        assert_eq!(dropdown.move_active(true), Some(0));
        assert_eq!(dropdown.move_active(true), Some(1));
        assert_eq!(dropdown.move_active(true), Some(2));
        assert_eq!(dropdown.move_active(true), Some(0));
        assert_eq!(dropdown.move_active(false), Some(2));
    }

    #[test]
    fn test_move_up_from_nothing_selects_last() {
        let mut dropdown = Dropdown::suggestions(default_suggestions());
        assert_eq!(dropdown.move_active(false), Some(2));
    }

    #[test]
    fn test_non_selectable_states() {
        let mut dropdown = Dropdown::Empty {
            query: "zzz".into(),
        };
        assert_eq!(dropdown.option_count(), 0);
        assert_eq!(dropdown.move_active(true), None);
        assert!(dropdown.active_option().is_none());

        assert!(!Dropdown::Hidden.is_visible());
    }

    #[test]
    fn test_active_option_is_suggestion() {
        let mut dropdown = Dropdown::suggestions(default_suggestions());
        dropdown.move_active(true);

        match dropdown.active_option() {
            Some(DropdownOption::Suggestion(s)) => assert_eq!(s.query, "paciente "),
            other => panic!("unexpected option: {other:?}"),
        }
    }
}

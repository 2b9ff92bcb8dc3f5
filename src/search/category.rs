//! Search categories
//!
//! Which backend resource each category reads, which fields it matches on,
//! and which words in a query point at it.

use serde::Serialize;

// == Search Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    Patients,
    Professionals,
    Anamneses,
}

impl SearchCategory {
    /// Display order when no category is prioritized.
    pub const ALL: [SearchCategory; 3] = [
        SearchCategory::Patients,
        SearchCategory::Professionals,
        SearchCategory::Anamneses,
    ];

    /// Backend resource path.
    pub const fn resource(self) -> &'static str {
        match self {
            SearchCategory::Patients => "pacientes",
            SearchCategory::Professionals => "profissionais",
            SearchCategory::Anamneses => "anamneses",
        }
    }

    pub fn from_resource(resource: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.resource() == resource)
    }

    /// Fields matched against the query, in highlight priority order.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            SearchCategory::Patients => &["nome", "cpf", "email", "telefone", "endereco"],
            SearchCategory::Professionals => {
                &["nome", "registro", "especialidade", "email", "telefone"]
            }
            SearchCategory::Anamneses => &[
                "paciente_nome",
                "profissional_nome",
                "queixa_principal",
                "data",
            ],
        }
    }

    /// Field used as the option label.
    pub const fn label_field(self) -> &'static str {
        match self {
            SearchCategory::Anamneses => "paciente_nome",
            _ => "nome",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            SearchCategory::Patients => "Pacientes",
            SearchCategory::Professionals => "Profissionais",
            SearchCategory::Anamneses => "Anamneses",
        }
    }

    /// Lowercase words that, present in a query, prioritize this category.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            SearchCategory::Patients => &["paciente", "pacientes", "cpf", "patient"],
            SearchCategory::Professionals => &[
                "profissional",
                "profissionais",
                "psicologo",
                "psicólogo",
                "psicologa",
                "psicóloga",
                "crp",
                "professional",
            ],
            SearchCategory::Anamneses => &["anamnese", "anamneses", "queixa", "anamnesis"],
        }
    }
}

// == Query Plan ==
/// A query split into the category it points at and the text to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Category named by a keyword in the query, if any
    pub prioritized: Option<SearchCategory>,
    /// Lowercased query with category keywords removed
    pub needle: String,
}

impl QueryPlan {
    /// Sniffs category keywords out of `query`.
    ///
    /// The first keyword found decides the category. Keywords are removed
    /// from the needle so "paciente maria" matches patients named Maria.
    pub fn parse(query: &str) -> Self {
        let lowered = query.trim().to_lowercase();
        let mut prioritized = None;
        let mut kept = Vec::new();

        for word in lowered.split_whitespace() {
            let hit = SearchCategory::ALL
                .into_iter()
                .find(|c| c.keywords().contains(&word));
            match hit {
                Some(category) => {
                    prioritized.get_or_insert(category);
                }
                None => kept.push(word),
            }
        }

        Self {
            prioritized,
            needle: kept.join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        let plan = QueryPlan::parse("Paciente Maria");
        assert_eq!(plan.prioritized, Some(SearchCategory::Patients));
        assert_eq!(plan.needle, "maria");

        let plan = QueryPlan::parse("cpf 123.456");
        assert_eq!(plan.prioritized, Some(SearchCategory::Patients));
        assert_eq!(plan.needle, "123.456");

        let plan = QueryPlan::parse("psicóloga ana");
        assert_eq!(plan.prioritized, Some(SearchCategory::Professionals));
    }

    #[test]
    fn test_no_keyword() {
        let plan = QueryPlan::parse("  Souza ");
        assert_eq!(plan.prioritized, None);
        assert_eq!(plan.needle, "souza");
    }

    #[test]
    fn test_keyword_only_query() {
        let plan = QueryPlan::parse("anamnese");
        assert_eq!(plan.prioritized, Some(SearchCategory::Anamneses));
        assert!(plan.needle.is_empty());
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        let plan = QueryPlan::parse("pacientemente");
        assert_eq!(plan.prioritized, None);
    }

    #[test]
    fn test_resource_round_trip() {
        for category in SearchCategory::ALL {
            assert_eq!(SearchCategory::from_resource(category.resource()), Some(category));
        }
        assert_eq!(SearchCategory::from_resource("procedimentos"), None);
    }
}

//! OpenLibrary search request types.

use serde::{Deserialize, Serialize};

/// Search field selector for simple search.
///
/// Parsed from the caller's search-type string. Unknown values are kept as
/// [`SearchType::Custom`] and passed through as the field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    /// Free text across all fields (`all`, `text`); remote field `q`.
    Text,
    #[default]
    Author,
    Title,
    Subject,
    Person,
    Place,
    Publisher,
    Isbn,
    /// List search is not supported by the catalog; yields no results.
    Lists,
    /// Any other selector, used literally as the field name.
    Custom(String),
}

impl SearchType {
    /// Parse a search-type parameter.
    ///
    /// Absent or blank selectors default to [`SearchType::Author`].
    pub fn from_param(param: Option<&str>) -> Self {
        let Some(param) = param.map(str::trim).filter(|p| !p.is_empty()) else {
            return SearchType::default();
        };

        match param {
            "all" | "text" => SearchType::Text,
            "author" => SearchType::Author,
            "title" => SearchType::Title,
            "subject" => SearchType::Subject,
            "person" => SearchType::Person,
            "place" => SearchType::Place,
            "publisher" => SearchType::Publisher,
            "isbn" => SearchType::Isbn,
            "lists" => SearchType::Lists,
            other => {
                tracing::warn!(search_type = other, "unrecognized search type; using it as the field name");
                SearchType::Custom(other.to_string())
            }
        }
    }

    /// Remote search-field parameter, or None when the type is unsupported.
    pub fn field(&self) -> Option<&str> {
        match self {
            SearchType::Text => Some("q"),
            SearchType::Author => Some("author"),
            SearchType::Title => Some("title"),
            SearchType::Subject => Some("subject"),
            SearchType::Person => Some("person"),
            SearchType::Place => Some("place"),
            SearchType::Publisher => Some("publisher"),
            SearchType::Isbn => Some("isbn"),
            SearchType::Lists => None,
            SearchType::Custom(field) => Some(field.as_str()),
        }
    }
}

/// Query parameters sent to `search.json`, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pairs: Vec<(String, String)>,
}

impl CatalogQuery {
    /// A query on a single field.
    pub fn single(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { pairs: vec![(field.into(), value.into())] }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Unencoded `field=value` pairs joined with `&`.
    pub fn composed(&self) -> String {
        self.pairs
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn push_if_present(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value
            && !value.is_empty()
        {
            self.pairs.push((field.to_string(), value.to_string()));
        }
    }
}

/// Multi-field search. Empty fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Free text, sent as `q`.
    pub query: Option<String>,
}

impl AdvancedQuery {
    /// Build the catalog query in title, author, subject, free-text order.
    pub fn to_catalog_query(&self) -> CatalogQuery {
        let mut query = CatalogQuery::default();
        query.push_if_present("title", self.title.as_deref());
        query.push_if_present("author", self.author.as_deref());
        query.push_if_present("subject", self.subject.as_deref());
        query.push_if_present("q", self.query.as_deref());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_type_mapping() {
        assert_eq!(SearchType::from_param(Some("all")).field(), Some("q"));
        assert_eq!(SearchType::from_param(Some("text")).field(), Some("q"));
        assert_eq!(SearchType::from_param(Some("lists")).field(), None);
        assert_eq!(SearchType::from_param(None).field(), Some("author"));
        assert_eq!(SearchType::from_param(Some("  ")).field(), Some("author"));
        assert_eq!(SearchType::from_param(Some("subject")), SearchType::Subject);
    }

    #[test]
    fn test_unknown_search_type_is_literal() {
        let st = SearchType::from_param(Some("first_sentence"));
        assert_eq!(st, SearchType::Custom("first_sentence".into()));
        assert_eq!(st.field(), Some("first_sentence"));
    }

    #[test]
    fn test_advanced_query_order() {
        let q = AdvancedQuery {
            query: Some("dragons".into()),
            subject: Some("fantasy".into()),
            title: Some("hobbit".into()),
            author: Some("Tolkien".into()),
        };
        assert_eq!(q.to_catalog_query().composed(), "title=hobbit&author=Tolkien&subject=fantasy&q=dragons");
    }

    #[test]
    fn test_advanced_query_skips_empty() {
        let q = AdvancedQuery { subject: Some("fantasy".into()), title: Some(String::new()), ..Default::default() };
        let composed = q.to_catalog_query();
        assert_eq!(composed.composed(), "subject=fantasy");
        assert_eq!(composed.pairs().len(), 1);

        assert!(AdvancedQuery::default().to_catalog_query().is_empty());
    }

    #[test]
    fn test_composed_is_not_encoded() {
        let q = CatalogQuery::single("q", "lord of the rings");
        assert_eq!(q.composed(), "q=lord of the rings");
    }
}

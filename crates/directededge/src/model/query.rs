//! Relationship queries: `related` and `recommended`.

use std::collections::BTreeMap;

/// Which relationship query to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Related,
    Recommended,
}

impl QueryKind {
    /// Sub-path under the item resource; also the element name of each
    /// result in the response.
    pub fn path_segment(self) -> &'static str {
        match self {
            QueryKind::Related => "related",
            QueryKind::Recommended => "recommended",
        }
    }
}

/// Query parameters for a relationship query.
///
/// Ordered so that two option sets built in a different order compare and
/// hash equal, which makes this usable as a cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryOptions {
    params: BTreeMap<String, String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to items carrying any of `tags`.
    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = tags
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.param("tags", joined)
    }

    pub fn max_results(self, n: usize) -> Self {
        self.param("maxResults", n.to_string())
    }

    /// Drops items this item already links to.
    pub fn exclude_linked(self, exclude: bool) -> Self {
        self.param("excludeLinked", exclude.to_string())
    }

    pub fn include_properties(self, include: bool) -> Self {
        self.param("includeProperties", include.to_string())
    }

    /// Sets an arbitrary parameter, replacing an earlier value for `key`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One result of a relationship query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub id: String,
    /// Relevance reported by the server, if it sent one.
    pub weight: Option<f64>,
}

impl RankedItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_are_order_independent() {
        let a = QueryOptions::new().max_results(5).tags(["book", "dvd"]);
        let b = QueryOptions::new().tags(["book", "dvd"]).max_results(5);
        assert_eq!(a, b);

        let pairs: Vec<_> = a.iter().collect();
        assert_eq!(pairs, vec![("maxResults", "5"), ("tags", "book,dvd")]);
    }

    #[test]
    fn test_param_overwrites() {
        let opts = QueryOptions::new().max_results(5).max_results(10);
        assert_eq!(opts.iter().count(), 1);
        assert_eq!(opts, QueryOptions::new().param("maxResults", "10"));
    }
}

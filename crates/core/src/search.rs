//! Case-insensitive search over in-memory lists.
//!
//! Every directory-style page in the portal filters the list it already
//! fetched: linear scan, case-insensitive substring match over a few string
//! fields. The empty query matches everything.

/// A record that exposes the fields its list page searches over.
pub trait SearchFields {
    /// The searchable string fields, in page order. Optional fields that are
    /// absent on a given record are simply not included.
    fn search_fields(&self) -> Vec<&str>;
}

/// Whether `record` matches `query`.
///
/// A record matches when the lowercased query is a substring of any of its
/// configured fields, also lowercased. A query that is empty after trimming
/// matches every record.
pub fn matches<T: SearchFields>(query: &str, record: &T) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the records matching `query`, preserving order.
pub fn filter<'a, T: SearchFields>(query: &str, records: &'a [T]) -> Vec<&'a T> {
    records.iter().filter(|r| matches(query, *r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry {
        name: String,
        email: Option<String>,
    }

    impl SearchFields for Entry {
        fn search_fields(&self) -> Vec<&str> {
            let mut fields = vec![self.name.as_str()];
            if let Some(email) = &self.email {
                fields.push(email);
            }
            fields
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry {
                name: "Amara Okafor".into(),
                email: Some("amara@example.org".into()),
            },
            Entry {
                name: "Jonas Weber".into(),
                email: None,
            },
        ]
    }

    #[test]
    fn empty_query_matches_everything() {
        let all = entries();
        assert_eq!(filter("", &all).len(), 2);
        assert_eq!(filter("   ", &all).len(), 2);
    }

    #[test]
    fn match_is_case_insensitive() {
        let all = entries();
        let hits = filter("OKAFOR", &all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Amara Okafor");
    }

    #[test]
    fn substring_matches_any_configured_field() {
        let all = entries();
        assert_eq!(filter("example.org", &all).len(), 1);
        assert_eq!(filter("web", &all).len(), 1);
        assert!(filter("nowhere", &all).is_empty());
    }
}

use crate::{
    models::{
        author::{Author, AuthorCache},
        content::ContentRecord,
        search::{SearchQuery, SearchScope},
    },
    utils::date::DateFormatter,
};
use tracing::debug;

/// 内存搜索过滤引擎
/// 按范围分派到对应的字段匹配规则；保持输入顺序，不修改输入
#[derive(Debug, Clone, Default)]
pub struct SearchFilterEngine {
    dates: DateFormatter,
}

impl SearchFilterEngine {
    pub fn new(dates: DateFormatter) -> Self {
        Self { dates }
    }

    pub fn date_formatter(&self) -> &DateFormatter {
        &self.dates
    }

    pub fn filter<'a>(
        &self,
        records: &'a [ContentRecord],
        authors: &AuthorCache,
        query: &SearchQuery,
    ) -> Vec<&'a ContentRecord> {
        let needle = match query.needle() {
            Some(needle) => needle,
            None => return records.iter().collect(),
        };

        let matched: Vec<&ContentRecord> = records
            .iter()
            .filter(|record| self.matches(record, authors, &needle, query.scope))
            .collect();

        debug!(
            "Search '{}' in {} matched {} of {} records",
            needle,
            query.scope,
            matched.len(),
            records.len()
        );
        matched
    }

    /// `filter` 的拥有所有权版本，供视图保存投影结果
    pub fn filter_owned(
        &self,
        records: &[ContentRecord],
        authors: &AuthorCache,
        query: &SearchQuery,
    ) -> Vec<ContentRecord> {
        self.filter(records, authors, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// `needle` 必须已经去空白并转小写
    pub fn matches(
        &self,
        record: &ContentRecord,
        authors: &AuthorCache,
        needle: &str,
        scope: SearchScope,
    ) -> bool {
        match scope {
            SearchScope::Title => contains(&record.title, needle),
            SearchScope::Content => contains(&record.body, needle),
            SearchScope::Tags => contains(&record.tag_text, needle),
            SearchScope::Date => self.date_matches(record, needle),
            SearchScope::Author => authors
                .get(&record.author_key)
                .map_or(false, |author| author_matches(author, needle)),
            SearchScope::All => {
                contains(&record.title, needle)
                    || contains(&record.body, needle)
                    || contains(&record.tag_text, needle)
                    || self.date_matches(record, needle)
            }
        }
    }

    fn date_matches(&self, record: &ContentRecord, needle: &str) -> bool {
        contains(&self.dates.format(&record.created_at), needle)
    }
}

fn author_matches(author: &Author, needle: &str) -> bool {
    contains(&author.name, needle) || contains(&author.email, needle) || contains(&author.id, needle)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn records() -> Vec<ContentRecord> {
        vec![
            ContentRecord::new("1", "Go basics")
                .with_tags("go,backend")
                .with_body("Goroutines and channels")
                .with_author("u1")
                .with_created_at(ts("2024-03-05T10:00:00Z")),
            ContentRecord::new("2", "CSS tricks")
                .with_tags("css,frontend")
                .with_body("Flexbox and grid for React apps")
                .with_author("u2")
                .with_created_at(ts("2023-11-20T08:30:00Z")),
            ContentRecord::new("3", "React hooks in depth")
                .with_tags("react, frontend")
                .with_body("useEffect pitfalls")
                .with_author("ghost")
                .with_created_at(ts("2024-01-15T12:00:00Z")),
        ]
    }

    fn authors() -> AuthorCache {
        let mut cache = AuthorCache::new();
        cache.insert("u1", Author::new("u1", "Rob Pike", "rob@golang.org"));
        cache.insert("u2", Author::new("u2", "Lea Verou", "lea@css.dev"));
        cache
    }

    fn ids(found: &[&ContentRecord]) -> Vec<String> {
        found.iter().map(|r| r.id.clone()).collect()
    }

    fn search(scope: SearchScope, text: &str) -> Vec<String> {
        let engine = SearchFilterEngine::default();
        let records = records();
        ids(&engine.filter(&records, &authors(), &SearchQuery::new(text, scope)))
    }

    #[test]
    fn test_tags_scope_example() {
        let engine = SearchFilterEngine::default();
        let records = vec![
            ContentRecord::new("1", "Go basics").with_tags("go,backend"),
            ContentRecord::new("2", "CSS tricks").with_tags("css,frontend"),
        ];
        let found = engine.filter(&records, &AuthorCache::new(), &SearchQuery::new("go", SearchScope::Tags));
        assert_eq!(ids(&found), vec!["1"]);

        let found = engine.filter(&records, &AuthorCache::new(), &SearchQuery::new("x", SearchScope::All));
        assert!(found.is_empty());
    }

    #[test]
    fn test_blank_query_is_identity() {
        let engine = SearchFilterEngine::default();
        let records = records();
        for scope in SearchScope::ALL_SCOPES {
            for text in ["", "   ", "\t\n"] {
                let found = engine.filter_owned(&records, &AuthorCache::new(), &SearchQuery::new(text, scope));
                assert_eq!(found, records);
            }
        }
    }

    #[test]
    fn test_title_scope_is_case_insensitive() {
        assert_eq!(search(SearchScope::Title, "REACT"), search(SearchScope::Title, "react"));
        assert_eq!(search(SearchScope::Title, "  React "), vec!["3"]);
    }

    #[test]
    fn test_content_scope_only_checks_body() {
        assert_eq!(search(SearchScope::Content, "react"), vec!["2"]);
        assert_eq!(search(SearchScope::Content, "basics"), Vec::<String>::new());
    }

    #[test]
    fn test_tags_scope_matches_raw_text() {
        assert_eq!(search(SearchScope::Tags, "frontend"), vec!["2", "3"]);
        assert_eq!(search(SearchScope::Tags, "go,back"), vec!["1"]);
    }

    #[test]
    fn test_date_scope_uses_short_date() {
        assert_eq!(search(SearchScope::Date, "3/5/2024"), vec!["1"]);
        assert_eq!(search(SearchScope::Date, "2024"), vec!["1", "3"]);
        assert_eq!(search(SearchScope::Date, "11/20"), vec!["2"]);
    }

    #[test]
    fn test_author_scope_requires_resolved_author() {
        assert_eq!(search(SearchScope::Author, "pike"), vec!["1"]);
        assert_eq!(search(SearchScope::Author, "css.dev"), vec!["2"]);
        assert_eq!(search(SearchScope::Author, "u"), vec!["1", "2"]);
        assert_eq!(search(SearchScope::Author, "ghost"), Vec::<String>::new());

        let engine = SearchFilterEngine::default();
        let records = records();
        let found = engine.filter(&records, &AuthorCache::new(), &SearchQuery::new("rob", SearchScope::Author));
        assert!(found.is_empty());
    }

    #[test]
    fn test_all_scope_is_or_without_authors() {
        assert_eq!(search(SearchScope::All, "react"), vec!["2", "3"]);
        assert_eq!(search(SearchScope::All, "go"), vec!["1"]);
        assert_eq!(search(SearchScope::All, "1/15/2024"), vec!["3"]);
        assert_eq!(search(SearchScope::All, "pike"), Vec::<String>::new());
    }

    #[test]
    fn test_filter_preserves_order_and_is_repeatable() {
        let engine = SearchFilterEngine::default();
        let records = records();
        let snapshot = records.clone();
        let query = SearchQuery::new("e", SearchScope::All);

        let first = ids(&engine.filter(&records, &authors(), &query));
        let second = ids(&engine.filter(&records, &authors(), &query));
        assert_eq!(first, vec!["1", "2", "3"]);
        assert_eq!(first, second);
        assert_eq!(records, snapshot);
    }
}

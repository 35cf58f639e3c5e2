use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rainbow_blog_client::{
    Author, AuthorCache, ContentRecord, SearchFilterEngine, SearchQuery, SearchScope,
};

fn scope_strategy() -> impl Strategy<Value = SearchScope> {
    prop::sample::select(SearchScope::ALL_SCOPES.to_vec())
}

fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

prop_compose! {
    fn record_strategy()(
        id in 0u32..1000,
        title in "[a-zA-Z ]{0,16}",
        body in "[a-zA-Z ]{0,24}",
        tags in "[a-z]{1,6}(,[a-z]{1,6}){0,3}",
        author in 0u8..5,
        created_at in timestamp_strategy(),
    ) -> ContentRecord {
        ContentRecord::new(id.to_string(), title)
            .with_body(body)
            .with_tags(tags)
            .with_author(format!("u{}", author))
            .with_created_at(created_at)
    }
}

fn partial_cache() -> AuthorCache {
    let mut cache = AuthorCache::new();
    cache.insert("u0", Author::new("u0", "Ada Lovelace", "ada@example.com"));
    cache.insert("u2", Author::new("u2", "Grace Hopper", "grace@example.com"));
    cache
}

proptest! {
    #[test]
    fn blank_query_returns_input(
        records in prop::collection::vec(record_strategy(), 0..20),
        scope in scope_strategy(),
        blank in "[ \t]{0,4}",
    ) {
        let engine = SearchFilterEngine::default();
        let found = engine.filter_owned(&records, &partial_cache(), &SearchQuery::new(blank, scope));
        prop_assert_eq!(found, records);
    }

    #[test]
    fn matching_ignores_case(
        records in prop::collection::vec(record_strategy(), 0..20),
        scope in scope_strategy(),
        query in "[a-zA-Z]{1,3}",
    ) {
        let engine = SearchFilterEngine::default();
        let cache = partial_cache();
        let upper = engine.filter_owned(&records, &cache, &SearchQuery::new(query.to_uppercase(), scope));
        let lower = engine.filter_owned(&records, &cache, &SearchQuery::new(query.to_lowercase(), scope));
        prop_assert_eq!(upper, lower);
    }

    #[test]
    fn author_scope_excludes_unresolved(
        records in prop::collection::vec(record_strategy(), 0..20),
        query in "[a-z0-9@.]{1,3}",
    ) {
        let engine = SearchFilterEngine::default();
        let cache = partial_cache();
        let found = engine.filter(&records, &cache, &SearchQuery::new(query, SearchScope::Author));
        prop_assert!(found.iter().all(|record| cache.contains(&record.author_key)));
    }

    #[test]
    fn filter_is_an_ordered_subsequence(
        records in prop::collection::vec(record_strategy(), 0..20),
        scope in scope_strategy(),
        query in "[a-z]{1,2}",
    ) {
        let engine = SearchFilterEngine::default();
        let found = engine.filter(&records, &partial_cache(), &SearchQuery::new(query, scope));

        let mut remaining = records.iter();
        for hit in found {
            prop_assert!(remaining.any(|record| std::ptr::eq(record, hit)));
        }
    }

    #[test]
    fn all_scope_is_union_of_field_scopes(
        records in prop::collection::vec(record_strategy(), 0..20),
        query in "[a-z0-9/]{1,3}",
    ) {
        let engine = SearchFilterEngine::default();
        let cache = partial_cache();
        let needle = query.to_lowercase();

        for record in &records {
            let any_field = [SearchScope::Title, SearchScope::Content, SearchScope::Tags, SearchScope::Date]
                .into_iter()
                .any(|scope| engine.matches(record, &cache, &needle, scope));
            prop_assert_eq!(engine.matches(record, &cache, &needle, SearchScope::All), any_field);
        }
    }
}

#[test]
fn example_scenarios() {
    let engine = SearchFilterEngine::default();
    let cache = AuthorCache::new();
    let records = vec![
        ContentRecord::new("1", "Go basics").with_tags("go,backend"),
        ContentRecord::new("2", "CSS tricks").with_tags("css,frontend"),
    ];

    let tags: Vec<&str> = engine
        .filter(&records, &cache, &SearchQuery::new("go", SearchScope::Tags))
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(tags, vec!["1"]);

    assert!(engine
        .filter(&records, &cache, &SearchQuery::new("x", SearchScope::All))
        .is_empty());
}

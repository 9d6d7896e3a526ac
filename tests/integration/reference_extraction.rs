//! Integration tests for table reference extraction

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sqltools::ParseError;
    use sqltools::sql::{Reference, extract_references};

    fn aliased(name: &str, alias: &str) -> Reference {
        Reference {
            schema: None,
            name: Some(name.to_string()),
            alias: Some(alias.to_string()),
            is_function: false,
        }
    }

    #[rstest]
    #[case("SELECT * FROM t1 a JOIN t2 b ON a.id = b.t1_id")]
    #[case("select a.x, b.y from t1 a join t2 b on a.id = b.t1_id where a.z > 1")]
    #[case("SELECT count(*) FROM t1 a JOIN t2 b ON a.id = b.t1_id GROUP BY a.x;")]
    #[case("SELECT *\n  FROM t1 a -- orders\n  JOIN t2 b ON a.id = b.t1_id /* done */")]
    #[case("SELECT * FROM t1 a INNER JOIN t2 b ON a.id = b.t1_id ORDER BY 1 LIMIT 5")]
    fn test_join_yields_two_aliased_tables(#[case] sql: &str) {
        let refs = extract_references(sql).unwrap();
        assert_eq!(refs, vec![aliased("t1", "a"), aliased("t2", "b")]);
        assert!(refs.iter().all(|r| !r.is_function));
    }

    #[test]
    fn test_mixed_statement_kinds() {
        let sql = "\
            INSERT INTO archive (id) SELECT id FROM orders o WHERE o.total > 100;\n\
            UPDATE customers c SET name = 'x' WHERE c.id IN (SELECT customer_id FROM orders);\n\
            DELETE FROM order_items";
        let refs = extract_references(sql).unwrap();
        let names: Vec<_> = refs.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(
            names,
            vec!["archive", "orders", "customers", "orders", "order_items"]
        );
        assert_eq!(refs[1].alias.as_deref(), Some("o"));
        assert_eq!(refs[2].alias.as_deref(), Some("c"));
    }

    #[test]
    fn test_subselect_and_function_aliases() {
        let sql = "SELECT * FROM (SELECT * FROM orders) recent \
                   JOIN unnest(ARRAY[1, 2]) AS n ON true";
        let refs = extract_references(sql).unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].name.as_deref(), Some("orders"));
        assert!(refs[1].is_query_alias());
        assert_eq!(refs[1].alias.as_deref(), Some("recent"));
        assert!(refs[2].is_function);
        assert_eq!(refs[2].alias.as_deref(), Some("n"));
    }

    #[test]
    fn test_partial_statement_while_typing() {
        let refs = extract_references("SELECT c. FROM customers c WHERE c.").unwrap();
        assert_eq!(refs, vec![aliased("customers", "c")]);
    }

    #[test]
    fn test_dangling_quote_keeps_earlier_tables() {
        let refs =
            extract_references("SELECT * FROM orders o JOIN customers c ON c.name = 'Ann")
                .unwrap();
        assert_eq!(refs, vec![aliased("orders", "o"), aliased("customers", "c")]);

        let refs = extract_references("SELECT * FROM orders o WHERE o.\"Note").unwrap();
        assert_eq!(refs, vec![aliased("orders", "o")]);
    }

    #[test]
    fn test_tokenizer_failure_is_reported() {
        let err = extract_references("SELECT * FROM t /* unterminated").unwrap_err();
        assert!(matches!(err, ParseError::Tokenize(_)));
    }

    #[test]
    fn test_keywords_never_bound_as_names() {
        let refs = extract_references("CREATE TABLE t AS SELECT * FROM src").unwrap();
        assert!(refs.iter().all(|r| r.alias.is_none()));

        let refs = extract_references("SELECT * FROM orders o FOR UPDATE OF o").unwrap();
        assert_eq!(refs, vec![aliased("orders", "o")]);
    }
}

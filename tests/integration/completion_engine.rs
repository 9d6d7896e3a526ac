//! Integration tests for the completion engine
//!
//! Each test drives `get_auto_complete_list` the way an editor would:
//! a prefix, the statement around the cursor, and the text up to it.

#[cfg(test)]
mod tests {
    use crate::common::{
        JOIN_STATEMENT, engine_with, inserts, labels, orders_catalog, shop_catalog, smart_engine,
    };
    use sqltools::db::Catalog;

    // ── no separator ────────────────────────────────────────

    #[test]
    fn test_join_condition_scenario() {
        let engine = smart_engine(&orders_catalog());
        let result = engine
            .get_auto_complete_list("", JOIN_STATEMENT, JOIN_STATEMENT)
            .unwrap();
        let labels = labels(&result);
        assert!(labels.contains(&"o.customer_id = c.id"));
        assert!(labels.contains(&"c.id = o.customer_id"));
        assert!(!result.inhibit);
    }

    #[test]
    fn test_join_conditions_filtered_by_prefix() {
        let engine = smart_engine(&orders_catalog());
        let sql = format!("{}o", JOIN_STATEMENT);
        let result = engine.get_auto_complete_list("o", &sql, &sql).unwrap();
        assert_eq!(labels(&result)[0], "o.customer_id = c.id");
        assert!(!labels(&result).contains(&"c.id = o.customer_id"));
    }

    #[test]
    fn test_statement_aliases_and_objects_first() {
        let engine = smart_engine(&orders_catalog());
        let sql = "SELECT  FROM orders o JOIN customers c ON o.customer_id = c.id";
        let result = engine.get_auto_complete_list("", sql, "SELECT ").unwrap();
        assert_eq!(
            labels(&result)[..7],
            [
                "o\t(Alias)",
                "c\t(Alias)",
                "id\t(orders Col)",
                "customer_id\t(orders Col)",
                "id\t(customers Col)",
                "orders\t(Table)",
                "customers\t(Table)",
            ]
        );
        assert_eq!(labels(&result)[7], "SELECT\t(Keyword)");
    }

    #[test]
    fn test_statement_function_ranks_before_keywords() {
        let engine = smart_engine(&shop_catalog());
        let sql = "SELECT * FROM public.order_total(1) t WHERE ";
        let result = engine.get_auto_complete_list("order", sql, sql).unwrap();
        assert_eq!(
            labels(&result),
            vec![
                "order_total(integer)\t(public Func)",
                "ORDER BY\t(Keyword)",
                "order_id\t(order_items Col)",
                "orders\t(public Table)",
                "order_items\t(public Table)",
            ]
        );
        assert!(!result.inhibit);
    }

    #[test]
    fn test_dollar_sign_escaped_in_insert_text() {
        let engine = smart_engine(&shop_catalog());
        let result = engine.get_auto_complete_list("pri", "", "").unwrap();
        assert_eq!(labels(&result), vec!["price$\t(order_items Col)"]);
        assert_eq!(inserts(&result), vec!["price\\$"]);
    }

    #[test]
    fn test_opening_quote_strips_inserted_quotes() {
        let engine = smart_engine(&shop_catalog());
        let result = engine.get_auto_complete_list("\"Lo", "", "").unwrap();
        assert_eq!(inserts(&result), vec!["Log", "lower(text)"]);
    }

    // ── one separator ───────────────────────────────────────

    #[test]
    fn test_alias_expansion_scenario() {
        let engine = smart_engine(&orders_catalog());
        let sql = format!("{}o.", JOIN_STATEMENT);
        let result = engine.get_auto_complete_list("o.", &sql, &sql).unwrap();
        let labels = labels(&result);
        let id = labels.iter().position(|l| *l == "id\t(orders Col)").unwrap();
        let fk = labels
            .iter()
            .position(|l| *l == "customer_id\t(orders Col)")
            .unwrap();
        assert!(id < fk);
        assert!(!labels.iter().any(|l| l.contains("customers")));
        assert!(result.inhibit);
    }

    #[test]
    fn test_alias_on_schema_qualified_table() {
        let engine = smart_engine(&shop_catalog());
        let sql = "SELECT * FROM public.orders o WHERE o.";
        let result = engine.get_auto_complete_list("o.", sql, sql).unwrap();
        assert_eq!(inserts(&result), vec!["id", "customer_id", "total"]);
        assert!(result.inhibit);
    }

    #[test]
    fn test_unterminated_literal_keeps_aliases() {
        let catalog = Catalog::new(
            vec!["orders".into()],
            vec!["orders.id".into(), "orders.total".into()],
            vec![],
        );
        let engine = smart_engine(&catalog);
        let sql = "SELECT o. FROM orders o WHERE o.note = 'abc";
        let result = engine.get_auto_complete_list("o.", sql, "SELECT o.").unwrap();
        assert_eq!(inserts(&result), vec!["id", "total"]);
        assert!(result.inhibit);
    }

    #[test]
    fn test_unparsable_statement_uses_catalog() {
        let engine = smart_engine(&orders_catalog());
        let sql = "SELECT orders.c FROM orders /* note";
        let result = engine
            .get_auto_complete_list("orders.c", sql, "SELECT orders.c")
            .unwrap();
        assert_eq!(labels(&result), vec!["customer_id\t(orders Col)"]);
        assert!(result.inhibit);
    }

    // ── two or more separators ──────────────────────────────

    #[test]
    fn test_multi_separator_scenario() {
        let catalog = Catalog::new(
            vec!["b.c".into(), "b.cx".into()],
            vec!["b.col".into(), "a.b.cc".into(), "b.x".into()],
            vec!["b.cf()".into()],
        );
        let engine = smart_engine(&catalog);
        let result = engine.get_auto_complete_list("a.b.c", "", "").unwrap();
        assert_eq!(
            labels(&result),
            vec!["col\t(b Col)", "cc\t(a.b Col)"]
        );
        assert!(result.inhibit);
    }

    // ── empty catalog and modes ─────────────────────────────

    #[test]
    fn test_empty_catalog_returns_none() {
        let engine = smart_engine(&Catalog::empty());
        for prefix in ["zz", "qq.x", "q.r.s", "\"xy"] {
            assert!(engine.get_auto_complete_list(prefix, "", "").is_none());
        }
    }

    #[test]
    fn test_basic_mode_never_inhibits() {
        let engine = engine_with(&orders_catalog(), "autocompletion = \"basic\"");
        let sql = "SELECT o. FROM orders o";
        let result = engine.get_auto_complete_list("orders.", sql, sql).unwrap();
        assert_eq!(
            labels(&result),
            vec!["id\t(orders Col)", "customer_id\t(orders Col)"]
        );
        assert!(!result.inhibit);
    }

    #[test]
    fn test_disabled_mode() {
        let engine = engine_with(&orders_catalog(), "autocompletion = \"disabled\"");
        assert!(engine.is_disabled());
        assert!(
            engine
                .get_auto_complete_list("o.", JOIN_STATEMENT, JOIN_STATEMENT)
                .is_none()
        );
    }

    #[test]
    fn test_json_output_shape() {
        let engine = smart_engine(&orders_catalog());
        let result = engine.get_auto_complete_list("cust", "", "").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["inhibit"], false);
        assert_eq!(value["items"][0]["label"], "customer_id\t(orders Col)");
        assert_eq!(value["items"][0]["insert_text"], "customer_id");
    }
}

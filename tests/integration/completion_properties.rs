//! Property tests for the completion engine and its helpers

#[cfg(test)]
mod tests {
    use crate::common::{orders_catalog, shop_catalog, smart_engine};
    use proptest::prelude::*;
    use sqltools::cursor::{prefix_before_cursor, statement_at_cursor};
    use sqltools::sql::{CompletionItem, ItemKind, extract_references};

    const STATEMENTS: &[&str] = &[
        "",
        "SELECT * FROM orders o JOIN customers c ON ",
        "SELECT o. FROM orders o WHERE o.total > 1",
        "SELECT * FROM public.order_total(1) t, (SELECT 1) s",
        "UPDATE customers SET name = 'x",
    ];

    fn statement() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(STATEMENTS).prop_map(String::from),
            "[ -~\n]{0,80}",
        ]
    }

    proptest! {
        #[test]
        fn completion_is_idempotent(prefix in "[a-zA-Z_.\"$]{0,8}", sql in statement()) {
            let engine = smart_engine(&shop_catalog());
            let first = engine.get_auto_complete_list(&prefix, &sql, &sql);
            let second = engine.get_auto_complete_list(&prefix, &sql, &sql);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn no_separator_never_inhibits(prefix in "[a-zA-Z_\"$]{0,8}", sql in statement()) {
            let engine = smart_engine(&orders_catalog());
            if let Some(result) = engine.get_auto_complete_list(&prefix, &sql, &sql) {
                prop_assert!(!result.inhibit);
                prop_assert!(!result.items.is_empty());
            }
        }

        #[test]
        fn multi_separator_inhibits_iff_a_column_matched(
            prefix in "[a-z]{1,3}\\.[a-z]{1,3}\\.[a-z]{0,3}",
            sql in statement(),
        ) {
            let catalog = shop_catalog();
            let engine = smart_engine(&catalog);
            let expected = catalog
                .columns
                .iter()
                .filter_map(|c| CompletionItem::new(ItemKind::Column, c.as_str()))
                .filter(|c| c.prefix_match_score(&prefix, false) > 0)
                .count();

            match engine.get_auto_complete_list(&prefix, &sql, &sql) {
                Some(result) => {
                    prop_assert!(result.inhibit);
                    prop_assert_eq!(result.items.len(), expected);
                }
                None => prop_assert_eq!(expected, 0),
            }
        }

        #[test]
        fn extraction_never_panics(sql in "[ -~\n]{0,120}") {
            let _ = extract_references(&sql);
        }

        #[test]
        fn cursor_helpers_never_panic(text in "\\PC{0,40}", offset in 0usize..64) {
            let prefix = prefix_before_cursor(&text, offset);
            let (statement, to_cursor) = statement_at_cursor(&text, offset);
            prop_assert!(prefix.len() <= text.len());
            prop_assert!(statement.starts_with(to_cursor));
        }
    }
}

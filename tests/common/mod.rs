//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use sqltools::config::{CompletionSettings, SettingsLayer};
use sqltools::db::Catalog;
use sqltools::sql::{Completion, Completions};

/// Statement with the cursor in the `ON` clause of a join
pub const JOIN_STATEMENT: &str = "SELECT * FROM orders o JOIN customers c ON ";

/// The orders/customers catalog used across the scenarios
pub fn orders_catalog() -> Catalog {
    Catalog::new(
        vec!["orders".into(), "customers".into()],
        vec![
            "orders.id".into(),
            "orders.customer_id".into(),
            "customers.id".into(),
        ],
        vec![],
    )
}

/// A larger catalog with schemas, quoted names and functions
pub fn shop_catalog() -> Catalog {
    Catalog::new(
        vec![
            "public.orders".into(),
            "public.customers".into(),
            "public.order_items".into(),
            "\"Audit\".\"Log\"".into(),
        ],
        vec![
            "orders.id".into(),
            "orders.customer_id".into(),
            "orders.total".into(),
            "customers.id".into(),
            "customers.name".into(),
            "order_items.order_id".into(),
            "order_items.price$".into(),
            "\"Log\".\"Message\"".into(),
        ],
        vec![
            "public.order_total(integer)".into(),
            "lower(text)".into(),
        ],
    )
}

pub fn smart_engine(catalog: &Catalog) -> Completion {
    Completion::new(catalog, &CompletionSettings::default())
}

/// Engine built from TOML settings text
pub fn engine_with(catalog: &Catalog, settings_toml: &str) -> Completion {
    let layer = SettingsLayer::from_toml(settings_toml).expect("valid settings TOML");
    let settings = CompletionSettings::resolve(&layer, &SettingsLayer::default());
    Completion::new(catalog, &settings)
}

pub fn labels(completions: &Completions) -> Vec<&str> {
    completions.items.iter().map(|s| s.label.as_str()).collect()
}

pub fn inserts(completions: &Completions) -> Vec<&str> {
    completions
        .items
        .iter()
        .map(|s| s.insert_text.as_str())
        .collect()
}

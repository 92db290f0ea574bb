//! Backend-specific SQL rendering of built conditions.

use sea_orm::{DatabaseBackend, EntityTrait, QueryTrait};

use filterset::{FilterSet, QueryParams, params_from_pairs};

mod common;
use common::fruit;

fn rendered_sql(filters: &FilterSet, params: &QueryParams, backend: DatabaseBackend) -> String {
    filters
        .apply_filters(fruit::Entity::find(), params, backend)
        .expect("filter building should succeed")
        .build(backend)
        .to_string()
}

#[test]
fn test_regex_renders_per_backend() {
    let filters = FilterSet::new([("name", "name__regex")]);
    let params = params_from_pairs([("name", "^ap")]);

    let postgres = rendered_sql(&filters, &params, DatabaseBackend::Postgres);
    assert!(postgres.contains("name ~ '^ap'"), "got: {postgres}");

    let mysql = rendered_sql(&filters, &params, DatabaseBackend::MySql);
    assert!(mysql.contains("name REGEXP '^ap'"), "got: {mysql}");
}

#[test]
fn test_case_insensitive_regex_on_postgres() {
    let filters = FilterSet::new([("name", "name__iregex")]);
    let params = params_from_pairs([("name", "^ap")]);

    let postgres = rendered_sql(&filters, &params, DatabaseBackend::Postgres);
    assert!(postgres.contains("name ~* '^ap'"), "got: {postgres}");
}

#[test]
fn test_icontains_renders_upper_like() {
    let filters = FilterSet::new([("name", "name__icontains")]);
    let params = params_from_pairs([("name", "ap")]);

    let sql = rendered_sql(&filters, &params, DatabaseBackend::Sqlite);
    assert!(sql.contains("UPPER("), "got: {sql}");
    assert!(sql.contains("LIKE"), "got: {sql}");
    assert!(sql.contains("%AP%"), "got: {sql}");
}

#[test]
fn test_membership_renders_in_clause() {
    let filters = FilterSet::new([("status", "status")]);
    let params = params_from_pairs([("status", "open,closed")]);

    let sql = rendered_sql(&filters, &params, DatabaseBackend::Sqlite);
    assert!(sql.contains("IN ("), "got: {sql}");
}

#[test]
fn test_groups_render_as_disjunction() {
    let filters = FilterSet::new([("status", "status")]);
    let params = params_from_pairs([("or1-status", "open"), ("or2-status", "closed")]);

    let sql = rendered_sql(&filters, &params, DatabaseBackend::Sqlite);
    assert!(sql.contains(" OR "), "got: {sql}");
}

#[test]
fn test_exclude_renders_negated() {
    let filters = FilterSet::new([("~status", "status")]);
    let params = params_from_pairs([("~status", "archived")]);

    let sql = rendered_sql(&filters, &params, DatabaseBackend::Sqlite);
    assert!(sql.contains("NOT"), "got: {sql}");
}

#[test]
fn test_like_wildcards_escaped() {
    let filters = FilterSet::new([("name", "name__contains")]);
    let params = params_from_pairs([("name", "50%")]);

    let sql = rendered_sql(&filters, &params, DatabaseBackend::Sqlite);
    assert!(sql.contains("50\\%"), "got: {sql}");
}

//! # Statement Factory
//!
//! One pure function per operation. Identifiers come from validated schemas,
//! literals from the codec, predicate and ordering text from the descriptor
//! algebra; by the time text reaches this module it is ready to splice.
//!
//! The dialect is broadly embedded-engine SQL with MySQL-leaning type names
//! in the column declarations. The existence check targets the engine's
//! `sqlite_master` catalog; whether it returns at least one row is the
//! existence signal.

use crate::records::encoder::FieldEntry;

/// `CREATE TABLE` declaring every entry's column and a trailing primary-key
/// constraint.
pub fn create_table(identifier: &str, entries: &[FieldEntry], primary_key: &str) -> String {
    let columns: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {}", e.name, e.type_name))
        .collect();
    format!(
        "CREATE TABLE {identifier}({}, PRIMARY KEY ({primary_key}));",
        columns.join(", ")
    )
}

pub fn drop_table(identifier: &str) -> String {
    format!("DROP TABLE {identifier};")
}

/// `INSERT` with column names and literal values in matching order.
pub fn insert(identifier: &str, entries: &[FieldEntry]) -> String {
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let values: Vec<&str> = entries.iter().map(|e| e.literal.as_str()).collect();
    format!(
        "INSERT INTO {identifier} ({}) VALUES ({});",
        names.join(", "),
        values.join(", ")
    )
}

/// Base select with optional `WHERE` and `ORDER BY` clauses.
pub fn select_all(identifier: &str, filter: Option<&str>, sort: Option<&str>) -> String {
    let mut command = format!("SELECT * FROM {identifier}");
    if let Some(filter) = filter {
        command.push_str(" WHERE ");
        command.push_str(filter);
    }
    if let Some(sort) = sort {
        command.push_str(" ORDER BY ");
        command.push_str(sort);
    }
    command.push(';');
    command
}

pub fn delete(identifier: &str, primary_key: &str, key_literal: &str) -> String {
    format!("DELETE FROM {identifier} WHERE {primary_key} = {key_literal};")
}

/// Catalog query whose "returns at least one row" outcome signals that the
/// table exists.
pub fn table_exists(identifier: &str) -> String {
    format!("SELECT name FROM sqlite_master WHERE type='table' AND name='{identifier}';")
}

/// True single-statement `UPDATE`. The façade's whole-record update goes
/// through delete-then-insert instead; this builder serves direct callers
/// that need a partial update.
pub fn update(
    identifier: &str,
    entries: &[FieldEntry],
    primary_key: &str,
    key_literal: &str,
) -> String {
    let assignments: Vec<String> = entries
        .iter()
        .map(|e| format!("{} = {}", e.name, e.literal))
        .collect();
    format!(
        "UPDATE {identifier} SET {} WHERE {primary_key} = {key_literal};",
        assignments.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FieldEntry> {
        vec![
            FieldEntry {
                name: "title".into(),
                type_name: "LONGTEXT NOT NULL".into(),
                literal: "\"intro\"".into(),
            },
            FieldEntry {
                name: "length".into(),
                type_name: "INT NOT NULL".into(),
                literal: "214".into(),
            },
        ]
    }

    #[test]
    fn create_table_declares_columns_and_primary_key() {
        assert_eq!(
            create_table("Track", &entries(), "title"),
            "CREATE TABLE Track(title LONGTEXT NOT NULL, length INT NOT NULL, \
             PRIMARY KEY (title));"
        );
    }

    #[test]
    fn insert_keeps_names_and_values_in_matching_order() {
        assert_eq!(
            insert("Track", &entries()),
            "INSERT INTO Track (title, length) VALUES (\"intro\", 214);"
        );
    }

    #[test]
    fn select_all_appends_optional_clauses_in_order() {
        assert_eq!(select_all("Track", None, None), "SELECT * FROM Track;");
        assert_eq!(
            select_all("Track", Some("length < 300"), None),
            "SELECT * FROM Track WHERE length < 300;"
        );
        assert_eq!(
            select_all("Track", Some("length < 300"), Some("title ASC")),
            "SELECT * FROM Track WHERE length < 300 ORDER BY title ASC;"
        );
        assert_eq!(
            select_all("Track", None, Some("title ASC")),
            "SELECT * FROM Track ORDER BY title ASC;"
        );
    }

    #[test]
    fn delete_targets_the_primary_key() {
        assert_eq!(
            delete("Track", "title", "\"intro\""),
            "DELETE FROM Track WHERE title = \"intro\";"
        );
    }

    #[test]
    fn drop_and_exists_render_fixed_shapes() {
        assert_eq!(drop_table("Track"), "DROP TABLE Track;");
        assert_eq!(
            table_exists("Track"),
            "SELECT name FROM sqlite_master WHERE type='table' AND name='Track';"
        );
    }

    #[test]
    fn update_renders_assignments_and_key_predicate() {
        assert_eq!(
            update("Track", &entries(), "title", "\"intro\""),
            "UPDATE Track SET title = \"intro\", length = 214 \
             WHERE title = \"intro\";"
        );
    }
}

//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from static table descriptors.

use super::params::PgBindValue;
use super::table::TableDef;

/// Direction of a related include: to_one (we hold the FK) or to_many (they hold the FK to us).
#[derive(Clone, Copy, Debug)]
pub enum IncludeDirection {
    ToOne,
    ToMany,
}

/// One related include for a single-query read: name, direction, related table, our key column, their key column.
pub struct IncludeSelect<'a> {
    pub name: &'a str,
    pub direction: IncludeDirection,
    pub related: &'a TableDef,
    pub our_key: &'a str,
    pub their_key: &'a str,
}

/// Quote identifier for PostgreSQL (safe: only from table descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn placeholder(n: usize, pg_type: &str) -> String {
    format!("${}::{}", n, pg_type)
}

fn column_list(table: &TableDef, alias: Option<&str>) -> String {
    table
        .columns
        .iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{}", a, quoted(c.name)),
            None => quoted(c.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT with includes in a single query: main table aliased as "main", each include as a scalar
/// subquery (json_agg for to_many, row_to_json for to_one). With `id`, restricts to that primary key.
pub fn select_with_includes(table: &TableDef, includes: &[IncludeSelect<'_>], id: Option<i32>) -> QueryBuf {
    const MAIN_ALIAS: &str = "main";
    let mut q = QueryBuf::new();
    let mut select_parts = vec![column_list(table, Some(MAIN_ALIAS))];
    for inc in includes {
        let rel_cols = column_list(inc.related, None);
        let sub_from = format!(
            "{} WHERE {} = {}.{}",
            quoted(inc.related.name),
            quoted(inc.their_key),
            MAIN_ALIAS,
            quoted(inc.our_key)
        );
        let subquery = match inc.direction {
            IncludeDirection::ToOne => format!(
                "(SELECT row_to_json(sub) FROM (SELECT {} FROM {}) sub)",
                rel_cols, sub_from
            ),
            IncludeDirection::ToMany => format!(
                "(SELECT COALESCE(json_agg(row_to_json(sub) ORDER BY sub.{}), '[]'::json) FROM (SELECT {} FROM {}) sub)",
                quoted(inc.related.pk),
                rel_cols,
                sub_from
            ),
        };
        select_parts.push(format!("{} AS {}", subquery, quoted(inc.name)));
    }

    let where_clause = match id {
        Some(id) => {
            let n = q.push_param(PgBindValue::Int(id));
            format!(" WHERE {}.{} = {}", MAIN_ALIAS, quoted(table.pk), placeholder(n, "integer"))
        }
        None => String::new(),
    };
    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{}",
        select_parts.join(", "),
        quoted(table.name),
        MAIN_ALIAS,
        where_clause,
        MAIN_ALIAS,
        quoted(table.pk)
    );
    q
}

/// INSERT the given columns and return the generated primary key. Columns missing from `values`
/// take their database default. Unknown column names are skipped.
pub fn insert(table: &TableDef, values: Vec<(&str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, v) in values {
        let Some(c) = table.column(name) else { continue };
        let n = q.push_param(v);
        cols.push(quoted(c.name));
        placeholders.push(placeholder(n, c.pg_type));
    }
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", quoted(table.name), quoted(table.pk))
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            quoted(table.name),
            cols.join(", "),
            placeholders.join(", "),
            quoted(table.pk)
        )
    };
    q
}

/// UPDATE by id: SET only the given columns (never the primary key). With nothing to set, falls
/// back to a SELECT of the key so callers can execute it unconditionally.
pub fn update(table: &TableDef, id: i32, values: Vec<(&str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, v) in values {
        if name == table.pk {
            continue;
        }
        let Some(c) = table.column(name) else { continue };
        let n = q.push_param(v);
        sets.push(format!("{} = {}", quoted(c.name), placeholder(n, c.pg_type)));
    }
    let id_param = q.push_param(PgBindValue::Int(id));
    q.sql = if sets.is_empty() {
        format!(
            "SELECT {} FROM {} WHERE {} = {}",
            quoted(table.pk),
            quoted(table.name),
            quoted(table.pk),
            placeholder(id_param, "integer")
        )
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = {}",
            quoted(table.name),
            sets.join(", "),
            quoted(table.pk),
            placeholder(id_param, "integer")
        )
    };
    q
}

/// DELETE by id.
pub fn delete(table: &TableDef, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(table.name),
        quoted(table.pk),
        placeholder(n, "integer")
    );
    q
}

/// SELECT EXISTS for a primary key.
pub fn exists(table: &TableDef, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Int(id));
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = {})",
        quoted(table.name),
        quoted(table.pk),
        placeholder(n, "integer")
    );
    q
}

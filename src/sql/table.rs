//! Static storage mapping for the two persisted tables.

/// One column of a persisted table. `pg_type` is used for parameter casts.
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub pg_type: &'static str,
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub pk: &'static str,
    /// Selected columns, in `FromRow` order.
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const fn col(name: &'static str, pg_type: &'static str) -> ColumnDef {
    ColumnDef { name, pg_type }
}

pub const OWNERS: TableDef = TableDef {
    name: "owners",
    pk: "id",
    columns: &[col("id", "integer"), col("name", "text"), col("email", "text")],
};

pub const PETS: TableDef = TableDef {
    name: "pets",
    pk: "id",
    columns: &[
        col("id", "integer"),
        col("name", "text"),
        col("species", "text"),
        col("age", "integer"),
        col("description", "text"),
        col("created_at", "timestamptz"),
        col("owner_id", "integer"),
    ],
};

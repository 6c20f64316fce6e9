//! Postgres-dialect statement builders.
//!
//! Builders only ever hold identifiers chosen by code (or checked against an
//! allow-list) and values that render as positional parameters. Nothing a client
//! sends is spliced into SQL text.

use std::fmt;
use std::str::FromStr;

use super::value::{Ident, SqlValue, Statement};

/// Alias used for the target table in every SELECT.
pub(crate) const ROW_ALIAS: &str = "t";

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Lenient parse: anything other than `asc`/`desc` (any case) becomes `Asc`.
    pub fn parse_or_asc(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Comparison operators usable in a [`Condition::Cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    fn as_sql(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }
}

/// A single `WHERE` predicate. Predicates are joined with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Cmp {
        column: Ident,
        op: CmpOp,
        value: SqlValue,
    },
    /// `"col"::text = $n`, comparing the column's text form.
    TextEq { column: Ident, value: String },
    /// `"col"::text LIKE $n`
    TextLike { column: Ident, pattern: String },
    /// `"col" ILIKE $n`
    ILike { column: Ident, pattern: String },
    IsNull(Ident),
    IsNotNull(Ident),
    In { column: Ident, values: Vec<SqlValue> },
}

impl Condition {
    fn render(&self, stmt: &mut Statement) {
        match self {
            Condition::Cmp { column, op, value } => match (op, value) {
                (CmpOp::Eq, SqlValue::Null) => stmt.push_sql(&format!("{column} IS NULL")),
                (CmpOp::Ne, SqlValue::Null) => stmt.push_sql(&format!("{column} IS NOT NULL")),
                _ => {
                    stmt.push_sql(&format!("{column} {} ", op.as_sql()));
                    stmt.push_bind(value.clone());
                }
            },
            Condition::TextEq { column, value } => {
                stmt.push_sql(&format!("{column}::text = "));
                stmt.push_bind(SqlValue::Text(value.clone()));
            }
            Condition::TextLike { column, pattern } => {
                stmt.push_sql(&format!("{column}::text LIKE "));
                stmt.push_bind(SqlValue::Text(pattern.clone()));
            }
            Condition::ILike { column, pattern } => {
                stmt.push_sql(&format!("{column} ILIKE "));
                stmt.push_bind(SqlValue::Text(pattern.clone()));
            }
            Condition::IsNull(column) => stmt.push_sql(&format!("{column} IS NULL")),
            Condition::IsNotNull(column) => stmt.push_sql(&format!("{column} IS NOT NULL")),
            Condition::In { column, values } => {
                if values.is_empty() {
                    stmt.push_sql("FALSE");
                    return;
                }
                stmt.push_sql(&format!("{column} IN ("));
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        stmt.push_sql(", ");
                    }
                    stmt.push_bind(value.clone());
                }
                stmt.push_sql(")");
            }
        }
    }
}

fn render_where(conditions: &[Condition], stmt: &mut Statement) {
    for (i, condition) in conditions.iter().enumerate() {
        stmt.push_sql(if i == 0 { " WHERE " } else { " AND " });
        condition.render(stmt);
    }
}

/// Shared predicate-building surface for every builder with a `WHERE` clause.
pub trait Filter {
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;

    fn filter(&mut self, condition: Condition) -> &mut Self {
        self.conditions_mut().push(condition);
        self
    }

    fn where_eq(&mut self, column: impl Into<Ident>, value: impl Into<SqlValue>) -> &mut Self {
        self.where_cmp(column, CmpOp::Eq, value)
    }

    fn where_cmp(
        &mut self,
        column: impl Into<Ident>,
        op: CmpOp,
        value: impl Into<SqlValue>,
    ) -> &mut Self {
        self.filter(Condition::Cmp {
            column: column.into(),
            op,
            value: value.into(),
        })
    }

    fn where_ilike(&mut self, column: impl Into<Ident>, pattern: impl Into<String>) -> &mut Self {
        self.filter(Condition::ILike {
            column: column.into(),
            pattern: pattern.into(),
        })
    }

    fn where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.filter(Condition::IsNull(column.into()))
    }

    fn where_in<V: Into<SqlValue>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.filter(Condition::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }
}

/// SELECT against a single table, rows returned as JSON objects.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: Ident,
    conditions: Vec<Condition>,
    order: Vec<(Ident, SortDirection)>,
    offset: Option<i64>,
    limit: Option<i64>,
}

impl SelectQuery {
    pub fn new(table: impl Into<Ident>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(Ident, SortDirection)] {
        &self.order
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn order_by(&mut self, column: impl Into<Ident>, direction: SortDirection) -> &mut Self {
        self.order.push((column.into(), direction));
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// `SELECT COUNT(*)` over the filtered query. Ordering and paging are ignored.
    pub fn to_count_statement(&self) -> Statement {
        let mut stmt = Statement::default();
        stmt.push_sql(&format!(
            "SELECT COUNT(*) AS total FROM {} AS {ROW_ALIAS}",
            self.table
        ));
        render_where(&self.conditions, &mut stmt);
        stmt
    }

    /// Row query; each row comes back as one `jsonb` object keyed by column name.
    pub fn to_rows_statement(&self) -> Statement {
        let mut stmt = Statement::default();
        stmt.push_sql(&format!(
            "SELECT to_jsonb({ROW_ALIAS}) AS data FROM {} AS {ROW_ALIAS}",
            self.table
        ));
        render_where(&self.conditions, &mut stmt);
        for (i, (column, direction)) in self.order.iter().enumerate() {
            stmt.push_sql(if i == 0 { " ORDER BY " } else { ", " });
            stmt.push_sql(&format!("{column} {direction}"));
        }
        if let Some(offset) = self.offset {
            stmt.push_sql(" OFFSET ");
            stmt.push_bind(SqlValue::Int(offset));
        }
        if let Some(limit) = self.limit {
            stmt.push_sql(" LIMIT ");
            stmt.push_bind(SqlValue::Int(limit));
        }
        stmt
    }

    /// `DELETE` restricted by this query's predicates.
    pub fn to_delete_statement(&self) -> Statement {
        let mut stmt = Statement::default();
        stmt.push_sql(&format!("DELETE FROM {}", self.table));
        render_where(&self.conditions, &mut stmt);
        stmt
    }
}

impl Filter for SelectQuery {
    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

/// `UPDATE ... SET ... WHERE ...` with explicit assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    table: Ident,
    assignments: Vec<(Ident, SqlValue)>,
    conditions: Vec<Condition>,
}

impl UpdateQuery {
    pub fn new(table: impl Into<Ident>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn set(&mut self, column: impl Into<Ident>, value: impl Into<SqlValue>) -> &mut Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn assignments(&self) -> &[(Ident, SqlValue)] {
        &self.assignments
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn to_statement(&self) -> Statement {
        let mut stmt = Statement::default();
        stmt.push_sql(&format!("UPDATE {} SET ", self.table));
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                stmt.push_sql(", ");
            }
            stmt.push_sql(&format!("{column} = "));
            stmt.push_bind(value.clone());
        }
        render_where(&self.conditions, &mut stmt);
        stmt
    }
}

impl Filter for UpdateQuery {
    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

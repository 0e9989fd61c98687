//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use recycle_stock::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("\"transaction\" t")
//!     .left_join("transaction_category tc ON tc.transaction_id = t.id")
//!     .where_eq("tc.category_id", "7")
//!     .where_contains("t.order_id", "ORD-")
//!     .order_by(&["tc.category_id ASC"])
//!     .limit(10)
//!     .build();
//! assert_eq!(params, vec!["7", "%ORD-%"]);
//! ```

/// Builds parameterized SQL queries safely.
///
/// Params are collected in clause order (WHERE before HAVING), which is also
/// the order placeholders appear in the generated SQL.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    where_params: Vec<String>,
    group_by_cols: Vec<String>,
    having_clauses: Vec<String>,
    having_params: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table (with optional alias).
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            where_params: Vec::new(),
            group_by_cols: Vec::new(),
            having_clauses: Vec::new(),
            having_params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a full JOIN expression, e.g. `"JOIN category c ON c.category_id = x.category_id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a `LEFT JOIN {target}`; `target` carries the table, alias and ON condition.
    pub fn left_join(&mut self, target: &str) -> &mut Self {
        self.joins.push(format!("LEFT JOIN {}", target));
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.where_params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} = ?", column), &[value])
    }

    /// Add a case-sensitive substring condition.
    ///
    /// `%`, `_` and `\` in `value` are escaped so they match literally.
    pub fn where_contains(&mut self, column: &str, value: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(value));
        self.where_clause(&format!("{} LIKE ? ESCAPE '\\'", column), &[&pattern])
    }

    /// Match the date portion of a timestamp column: `CAST({column} AS DATE) = CAST(? AS DATE)`.
    pub fn where_date_eq(&mut self, column: &str, date: &str) -> &mut Self {
        self.where_clause(&format!("CAST({} AS DATE) = CAST(? AS DATE)", column), &[date])
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add a HAVING condition with `?` placeholders.
    pub fn having(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.having_clauses.push(condition.to_string());
        self.having_params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add ORDER BY clauses (e.g. `"category_id ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = self.body();

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        (parts.join("\n"), self.params())
    }

    /// Build a query returning the number of rows the grouped query yields.
    ///
    /// Wraps everything up to HAVING in `SELECT COUNT(*) AS total FROM (...)`;
    /// ORDER BY, LIMIT and OFFSET are dropped so the count covers every page.
    pub fn build_count(&self) -> (String, Vec<String>) {
        let inner = self.body().join("\n");
        (
            format!("SELECT COUNT(*) AS total\nFROM (\n{}\n) AS grouped", inner),
            self.params(),
        )
    }

    fn body(&self) -> Vec<String> {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        parts.extend(self.joins.iter().cloned());

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.having_clauses.is_empty() {
            parts.push(format!("HAVING {}", self.having_clauses.join(" AND ")));
        }

        parts
    }

    fn params(&self) -> Vec<String> {
        self.where_params
            .iter()
            .chain(self.having_params.iter())
            .cloned()
            .collect()
    }
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

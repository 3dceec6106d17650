use std::collections::HashSet;

/// Untyped transaction table as produced by a [super::LedgerSource].
///
/// Column names are canonical (see [crate::schema::ColumnSchema]). Cells are kept
/// as strings; typing happens when the ledger projects the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| index.map(|index| row[index].as_str()))
    }

    /// Distinct values of a column, in order of first appearance. Empty if the
    /// column doesn't exist.
    pub fn distinct_values(&self, column: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.column_values(column)
            .filter(|value| seen.insert(*value))
            .collect()
    }

    /// Appends the rows of `other`, matching columns by name. Columns only one
    /// side has are added and left empty for the other side's rows.
    pub fn append(&mut self, other: RawTable) {
        for column in &other.columns {
            if self.column_index(column).is_none() {
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }
        let positions: Vec<usize> = other
            .columns
            .iter()
            .map(|column| {
                self.column_index(column)
                    .expect("column was added above")
            })
            .collect();
        let width = self.columns.len();
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (cell, position) in row.into_iter().zip(&positions) {
                aligned[*position] = cell;
            }
            self.rows.push(aligned);
        }
    }
}

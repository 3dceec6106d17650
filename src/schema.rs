use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Date,
    Label,
    Kind,
    Amount,
    Wallet,
    Category,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Label => "label",
            Self::Kind => "type",
            Self::Amount => "amount",
            Self::Wallet => "wallet",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares which header of an export file holds which canonical column, and
/// which canonical columns the ledger needs (in projection order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    raw_headers: Vec<(String, Column)>,
    required: Vec<Column>,
}

impl ColumnSchema {
    pub fn new(raw_headers: Vec<(String, Column)>, required: Vec<Column>) -> Self {
        Self {
            raw_headers,
            required,
        }
    }

    pub fn raw_headers(&self) -> impl Iterator<Item = (&str, Column)> {
        self.raw_headers
            .iter()
            .map(|(header, column)| (header.as_str(), *column))
    }

    pub fn required(&self) -> &[Column] {
        &self.required
    }

    /// Returns the canonical name for a raw header, or the header itself if the
    /// schema doesn't declare it.
    pub fn canonical_name<'a>(&self, raw_header: &'a str) -> &'a str {
        self.raw_headers
            .iter()
            .find(|(header, _)| header == raw_header)
            .map(|(_, column)| column.name())
            .unwrap_or(raw_header)
    }

    pub fn missing_raw_headers<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let headers: Vec<&str> = headers.into_iter().collect();
        self.raw_headers
            .iter()
            .filter(|(header, _)| !headers.contains(&header.as_str()))
            .map(|(header, _)| header.clone())
            .collect()
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::new(
            vec![
                ("date".to_string(), Column::Date),
                ("label".to_string(), Column::Label),
                ("type".to_string(), Column::Kind),
                ("amount".to_string(), Column::Amount),
                ("wallet".to_string(), Column::Wallet),
                ("Category name".to_string(), Column::Category),
            ],
            vec![
                Column::Date,
                Column::Label,
                Column::Kind,
                Column::Amount,
                Column::Wallet,
                Column::Category,
            ],
        )
    }
}

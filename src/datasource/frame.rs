//! Columnar output table

use serde::Serialize;
use std::collections::BTreeMap;

use crate::edm::{CellValue, ColumnKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visualization {
    #[default]
    Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMeta {
    pub preferred_visualization: Visualization,
}

/// A named, typed, nullable column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub kind: ColumnKind,
    pub values: Vec<Option<CellValue>>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
            kind,
            values: Vec::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered columns; every column holds the same number of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataFrame {
    pub name: String,
    pub meta: FrameMeta,
    pub fields: Vec<Field>,
}

impl DataFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: FrameMeta::default(),
            fields: Vec::new(),
        }
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append one row; `values` must line up with the fields
    pub fn append_row(&mut self, values: Vec<Option<CellValue>>) {
        debug_assert_eq!(values.len(), self.fields.len(), "row width mismatch");
        for (field, value) in self.fields.iter_mut().zip(values) {
            debug_assert!(
                value.as_ref().is_none_or(|v| v.kind() == field.kind),
                "cell kind does not match column {}",
                field.name
            );
            field.values.push(value);
        }
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> Option<Vec<Option<&CellValue>>> {
        if index >= self.row_count() {
            return None;
        }
        Some(
            self.fields
                .iter()
                .map(|field| field.values[index].as_ref())
                .collect(),
        )
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as a plain text table
    pub fn to_table_string(&self) -> String {
        let mut output = String::new();

        if self.row_count() == 0 {
            return "No records found.\n".to_string();
        }

        let names: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        output.push_str(&format!("{}\n", names.join(" | ")));
        output.push_str(&format!("{}\n", "-".repeat(names.len() * 15)));

        for index in 0..self.row_count() {
            let row: Vec<String> = self
                .fields
                .iter()
                .map(|field| match &field.values[index] {
                    Some(value) => value.to_string(),
                    None => "null".to_string(),
                })
                .collect();
            output.push_str(&format!("{}\n", row.join(" | ")));
        }

        output.push_str(&format!("\nTotal records: {}\n", self.row_count()));
        output
    }
}

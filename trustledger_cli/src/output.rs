use anyhow::Result;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::{Table, Tabled};
use trustledger_api::{Error, ResponseBody};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}

#[derive(Tabled, Debug, PartialEq)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled, Debug, PartialEq)]
struct ErrorRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Error")]
    error: String,
}

// -- Row builders --

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn build_field_rows(map: &serde_json::Map<String, Value>) -> Vec<FieldRow> {
    map.iter()
        .map(|(field, value)| FieldRow {
            field: field.clone(),
            value: cell(value),
        })
        .collect()
}

/// One row per element, columns are the union of keys in first-seen order.
fn build_list_table(items: &[Value]) -> Option<Table> {
    let mut columns: Vec<&str> = Vec::new();
    for item in items {
        for key in item.as_object()?.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for item in items {
        builder.push_record(columns.iter().map(|c| item.get(*c).map(cell).unwrap_or_default()));
    }
    Some(builder.build())
}

fn build_error_rows(err: &Error) -> Vec<ErrorRow> {
    let Some(api) = err.as_api() else {
        return Vec::new();
    };
    api.field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.into_iter().map(move |error| ErrorRow {
                field: field.clone(),
                error,
            })
        })
        .collect()
}

// -- Printing --

pub fn print_body(body: &ResponseBody, format: &OutputFormat) -> Result<()> {
    let value = match body {
        ResponseBody::Text(text) => {
            print!("{}", text);
            return Ok(());
        }
        ResponseBody::Json(value) => value,
    };

    match format {
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Table => match value {
            Value::Object(map) => println!("{}", Table::new(build_field_rows(map))),
            Value::Array(items) => match build_list_table(items) {
                Some(table) => println!("{}", table),
                None => println!("{}", serde_json::to_string_pretty(value)?),
            },
            other => println!("{}", cell(other)),
        },
    }
    Ok(())
}

/// Writes the status and any per-field errors to stderr.
pub fn print_failure(err: &Error) {
    if let Some(status) = err.status() {
        eprintln!("HTTP {}", status);
    }
    let rows = build_error_rows(err);
    if rows.len() > 1 || rows.first().is_some_and(|r| r.error != err.to_string()) {
        eprintln!("{}", Table::new(rows));
    }
}

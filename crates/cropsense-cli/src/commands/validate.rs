//! Validate command

use cropsense_forms::validate;
use serde::Serialize;
use tabled::Tabled;

use super::{parse_fields, Settings};

#[derive(Debug, Serialize, Tabled)]
pub struct ErrorRow {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct Report<'a> {
    valid: bool,
    #[serde(flatten)]
    result: &'a cropsense_forms::ValidationResult,
}

/// Exit code 1 when any field is invalid.
pub fn handle(specs: &[String], settings: &Settings) -> Result<i32, String> {
    let schema = settings.schema()?;
    let fields = parse_fields(specs)?;
    let result = validate(&fields, schema.fields());

    if result.is_valid() && settings.format == crate::output::OutputFormat::Table {
        println!("All {} fields are valid", schema.fields().len());
        return Ok(0);
    }

    let rows: Vec<ErrorRow> = schema
        .fields()
        .iter()
        .filter_map(|c| {
            result.error(&c.name).map(|message| ErrorRow {
                field: c.name.clone(),
                message: message.to_string(),
            })
        })
        .collect();

    let report = Report {
        valid: result.is_valid(),
        result: &result,
    };
    settings.format.print_rows(&report, &rows);

    Ok(if result.is_valid() { 0 } else { 1 })
}

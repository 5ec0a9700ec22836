//! Schema command

use serde::Serialize;
use tabled::Tabled;

use super::Settings;

#[derive(Debug, Serialize, Tabled)]
pub struct FieldRow {
    pub name: String,
    pub kind: String,
    pub required: bool,
    pub min: String,
    pub max: String,
    pub rule: String,
}

pub fn handle(settings: &Settings) -> Result<i32, String> {
    let schema = settings.schema()?;

    let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    let rows: Vec<FieldRow> = schema
        .fields()
        .iter()
        .map(|c| FieldRow {
            name: c.name.clone(),
            kind: format!("{:?}", c.kind).to_lowercase(),
            required: c.required,
            min: bound(c.min),
            max: bound(c.max),
            rule: c
                .effective_domain_rule()
                .map(|r| format!("{:?}", r))
                .unwrap_or_else(|| "-".into()),
        })
        .collect();

    settings.format.print_rows(&schema, &rows);
    Ok(0)
}

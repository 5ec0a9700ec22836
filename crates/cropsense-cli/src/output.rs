//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parses a format name from the config file.
    pub fn parse(name: &str) -> Result<Self, String> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| format!("Unknown output format: {}", name))
    }

    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
        }
    }

    /// Prints `rows` as a table, or `data` in the structured formats.
    pub fn print_rows<T: Serialize, R: Tabled>(&self, data: &T, rows: &[R]) {
        match self {
            OutputFormat::Table => println!("{}", Table::new(rows)),
            _ => self.print(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("yaml").unwrap(), OutputFormat::Yaml);
        assert!(OutputFormat::parse("xml").is_err());
    }
}

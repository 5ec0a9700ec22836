//! Recommend command

use std::sync::Arc;

use cropsense_forms::NotificationCenter;
use cropsense_sdk::{HttpTransport, SubmitAttempt, Submitter};
use serde::Serialize;
use tabled::Tabled;

use super::validate::ErrorRow;
use super::{parse_fields, Settings};
use crate::surface::TerminalSurface;

#[derive(Debug, Serialize, Tabled)]
pub struct CropRow {
    pub rank: usize,
    pub crop: String,
    #[tabled(rename = "probability %")]
    pub probability: f64,
}

/// Exit code 1 unless the API returned a recommendation.
pub async fn handle(
    specs: &[String],
    timeout: Option<u64>,
    exclusive: bool,
    settings: &Settings,
) -> Result<i32, String> {
    let schema = settings.schema()?;
    let fields = parse_fields(specs)?;
    let config = settings.submitter_config(timeout, exclusive);
    let transport = HttpTransport::new(&config).map_err(|e| e.to_string())?;

    let notifications = NotificationCenter::new(Arc::new(TerminalSurface));
    let submitter = Submitter::new(config, schema, Arc::new(transport), notifications);

    match submitter.submit(&fields).await {
        SubmitAttempt::Rejected { validation, .. } => {
            let rows: Vec<ErrorRow> = submitter
                .schema()
                .fields()
                .iter()
                .filter_map(|c| {
                    validation.error(&c.name).map(|message| ErrorRow {
                        field: c.name.clone(),
                        message: message.to_string(),
                    })
                })
                .collect();
            settings.format.print_rows(&validation, &rows);
            Ok(1)
        }
        SubmitAttempt::InFlight => Err("another submission is already in flight".into()),
        SubmitAttempt::Submitted(outcome) => {
            match outcome.recommendation() {
                Some(recommendation) => {
                    let rows: Vec<CropRow> = recommendation
                        .top_crops
                        .iter()
                        .enumerate()
                        .map(|(i, score)| CropRow {
                            rank: i + 1,
                            crop: score.name.clone(),
                            probability: score.probability,
                        })
                        .collect();
                    if settings.format == crate::output::OutputFormat::Table {
                        println!("Recommended crop: {}", recommendation.recommended_crop);
                        if let Some(data) = &recommendation.crop_data {
                            println!(
                                "Season: {}  Water: {}  pH range: {}",
                                data.season.as_deref().unwrap_or("-"),
                                data.water.as_deref().unwrap_or("-"),
                                data.ph_range.as_deref().unwrap_or("-"),
                            );
                        }
                    }
                    settings.format.print_rows(&outcome, &rows);
                }
                None => settings.format.print(&outcome),
            }
            Ok(if outcome.success { 0 } else { 1 })
        }
    }
}

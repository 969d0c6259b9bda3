//! `transcript lookup <REG_NO>`: fetch and grade one student's result.

use crate::config::EngineConfig;
use crate::engine::{outcome_json, TranscriptEngine};
use anyhow::Result;

/// Run the lookup command. Returns whether the lookup succeeded.
pub async fn run(config: EngineConfig, reg_no: &str, pretty: bool) -> Result<bool> {
    let engine = TranscriptEngine::new(config);
    let outcome = engine.submit_registration_number(reg_no).await;

    let json = outcome_json(&outcome);
    if pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{json}");
    }
    Ok(outcome.is_ok())
}

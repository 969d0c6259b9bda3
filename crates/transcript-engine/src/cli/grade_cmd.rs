//! `transcript grade`: quality points for a single course.

use crate::grading::quality::{quality_points, quality_points_per_credit_hour};
use anyhow::Result;

/// Run the grade command.
pub fn run(marks: u32, credit_hours: u32) -> Result<()> {
    let total = quality_points(marks, credit_hours);
    let per_ch = quality_points_per_credit_hour(marks, credit_hours);
    let json = serde_json::json!({
        "obtainedMarks": marks,
        "creditHours": credit_hours,
        "totalMarks": u64::from(credit_hours) * 20,
        "qualityPointsPerCreditHour": per_ch,
        "qualityPoints": total,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

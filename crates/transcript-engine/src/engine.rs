//! The lookup pipeline: transport → parser → aggregation.

use crate::acquisition::{transport_for, TransportClient};
use crate::config::EngineConfig;
use crate::error::{EngineError, Severity};
use crate::extraction::parse_result_page;
use crate::grading::aggregate;
use crate::model::{RegistrationNumber, StudentTranscript};
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, warn};

/// Outcome of one lookup.
pub type EngineResult = Result<StudentTranscript, EngineError>;

/// Fetches and grades one student's result per call.
///
/// Holds no per-request state, so one engine can serve concurrent calls.
pub struct TranscriptEngine {
    config: EngineConfig,
    transport: Box<dyn TransportClient>,
}

impl TranscriptEngine {
    /// Engine using the transport selected in `config`.
    pub fn new(config: EngineConfig) -> Self {
        let transport = transport_for(&config);
        Self { config, transport }
    }

    /// Engine with an explicit transport.
    pub fn with_transport(config: EngineConfig, transport: Box<dyn TransportClient>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look up `raw` on the portal and compute GPA/CGPA.
    pub async fn submit_registration_number(&self, raw: &str) -> EngineResult {
        let start = Instant::now();
        let result = self.lookup(raw).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(t) => info!(
                registration_no = %t.registration_no,
                transport = %self.transport.kind(),
                semesters = t.semesters.len(),
                courses = t.course_count(),
                cgpa = %t.cgpa,
                elapsed_ms,
                "lookup succeeded"
            ),
            Err(e) => match e.severity() {
                Severity::Warning => warn!(
                    registration_no = raw.trim(),
                    transport = %self.transport.kind(),
                    code = e.code(),
                    elapsed_ms,
                    "lookup failed: {e}"
                ),
                Severity::Error => error!(
                    registration_no = raw.trim(),
                    transport = %self.transport.kind(),
                    code = e.code(),
                    details = e.details().unwrap_or(""),
                    elapsed_ms,
                    "lookup failed: {e}"
                ),
            },
        }
        result
    }

    async fn lookup(&self, raw: &str) -> EngineResult {
        let reg = RegistrationNumber::parse(raw)?;
        let page = self.transport.fetch_result_page(&reg).await?;
        transcript_from_html(&page.html, &reg)
    }
}

/// Parse and grade an already fetched result page.
pub fn transcript_from_html(html: &str, reg: &RegistrationNumber) -> EngineResult {
    let parsed = parse_result_page(html, reg)?;
    if parsed.attempts.is_empty() {
        warn!(
            registration_no = %parsed.registration_no,
            "student found but no graded courses"
        );
    }

    let agg = aggregate(&parsed.attempts);
    Ok(StudentTranscript {
        student_name: parsed.student_name,
        registration_no: parsed.registration_no,
        cgpa: agg.cgpa,
        total_credit_hours: agg.total_credit_hours,
        total_quality_points: agg.total_quality_points,
        semesters: agg.semesters,
    })
}

/// Wire JSON for a lookup outcome.
pub fn outcome_json(result: &EngineResult) -> Value {
    let value = match result {
        Ok(t) => serde_json::to_value(t.report()),
        Err(e) => serde_json::to_value(e.report()),
    };
    value.unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "type": "error",
            "message": "Unexpected error occurred",
            "details": e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::RawPage;
    use crate::config::TransportKind;
    use async_trait::async_trait;

    const RESULT_PAGE: &str = include_str!("../tests/fixtures/result_page.html");

    struct CannedTransport(Result<&'static str, EngineError>);

    #[async_trait]
    impl TransportClient for CannedTransport {
        async fn fetch_result_page(
            &self,
            _reg: &RegistrationNumber,
        ) -> Result<RawPage, EngineError> {
            self.0.clone().map(|html| RawPage {
                url: "https://portal.test/result".into(),
                html: html.into(),
            })
        }

        fn kind(&self) -> TransportKind {
            TransportKind::Http
        }
    }

    fn engine(canned: Result<&'static str, EngineError>) -> TranscriptEngine {
        TranscriptEngine::with_transport(
            EngineConfig::default(),
            Box::new(CannedTransport(canned)),
        )
    }

    #[tokio::test]
    async fn test_fixture_transcript() {
        let t = engine(Ok(RESULT_PAGE))
            .submit_registration_number("2022-ag-7755")
            .await
            .unwrap();
        assert_eq!(t.student_name, "Ayesha Khan");
        assert_eq!(t.registration_no, "2022-ag-7755");

        let labels: Vec<&str> = t.semesters.iter().map(|s| s.semester.as_str()).collect();
        assert_eq!(labels, vec!["Winter 2022-2023", "Spring 2023"]);

        // MTH-101 retake (30 marks, Spring) replaces the failed attempt
        let spring = &t.semesters[1];
        let codes: Vec<&str> = spring.subjects.iter().map(|s| s.course_code.as_str()).collect();
        assert_eq!(codes, vec!["MTH-101", "ENG-102"]);
        assert_eq!(spring.subjects[0].quality_points.to_string(), "6.00");
        assert_eq!(spring.subjects[1].quality_points.to_string(), "6.33");
        assert_eq!(spring.gpa.to_string(), "2.466");

        assert_eq!(t.semesters[0].gpa.to_string(), "4.000");
        assert_eq!(t.total_credit_hours, 8);
        assert_eq!(t.total_quality_points.to_string(), "24.33");
        assert_eq!(t.cgpa.to_string(), "3.04125");
    }

    #[tokio::test]
    async fn test_blank_registration_never_reaches_transport() {
        let result = engine(Err(EngineError::Unreachable))
            .submit_registration_number("   ")
            .await;
        assert_eq!(result, Err(EngineError::MissingRegistration));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let result = engine(Err(EngineError::Timeout))
            .submit_registration_number("2022-ag-7755")
            .await;
        assert_eq!(result, Err(EngineError::Timeout));
    }

    #[tokio::test]
    async fn test_no_student_name() {
        let html = "<table class=\"table tab-content\"><tr><td>Registration #</td>\
                    <td>2022-ag-0000</td></tr><tr><td>Student Full Name</td><td></td></tr></table>";
        let result = engine(Ok(html))
            .submit_registration_number("2022-ag-0000")
            .await;
        assert_eq!(result, Err(EngineError::InvalidRegistration));
    }

    #[test]
    fn test_student_without_courses_is_success() {
        let html = "<table class=\"table tab-content\"><tr><td>Student Full Name</td>\
                    <td>Hina Tariq</td></tr></table>";
        let reg = RegistrationNumber::parse("2023-ag-1").unwrap();
        let t = transcript_from_html(html, &reg).unwrap();
        assert!(t.semesters.is_empty());
        assert!(t.cgpa.is_zero());
        assert_eq!(t.total_credit_hours, 0);
    }

    #[test]
    fn test_outcome_json_failure() {
        let json = outcome_json(&Err(EngineError::InvalidRegistration));
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "type": "warning",
                "message": "Invalid registration number, student not found"
            })
        );
    }

    #[test]
    fn test_outcome_json_success_shape() {
        let reg = RegistrationNumber::parse("2022-ag-7755").unwrap();
        let t = transcript_from_html(RESULT_PAGE, &reg).unwrap();
        let json = outcome_json(&Ok(t));
        assert_eq!(json["success"], true);
        assert_eq!(json["studentName"], "Ayesha Khan");
        assert_eq!(json["cgpa"], 3.04125);
        assert_eq!(json["totalCreditHours"], 8);
        assert_eq!(json["semesters"][0]["semester"], "Winter 2022-2023");
        assert_eq!(json["semesters"][0]["gpa"], 4.0);
        assert_eq!(json["semesters"][0]["subjects"][0]["courseCode"], "CS-101");
        assert_eq!(json["semesters"][0]["subjects"][0]["qualityPoints"], 12.0);
        assert!(json["semesters"][0]["subjects"][0].get("semester").is_none());
    }
}

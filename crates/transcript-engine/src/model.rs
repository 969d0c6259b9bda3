//! Transcript data model.
//!
//! Everything here is built fresh for one lookup and dropped once the
//! response has been produced.

use crate::error::EngineError;
use crate::grading::fixed::Fixed;
use serde::Serialize;
use std::fmt;

/// Trimmed, non-empty registration number. Otherwise opaque: it is passed
/// straight through to the upstream form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngineError::MissingRegistration);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the result table: one attempt at one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAttempt {
    pub semester: String,
    pub course_code: String,
    pub credit_hours: u32,
    pub obtained_marks: u32,
    pub grade: String,
}

impl CourseAttempt {
    /// Pass/non-graded attempts never count towards GPA.
    pub fn is_pass_only(&self) -> bool {
        self.grade == "P"
    }
}

/// The best attempt at a course, with its quality points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(skip)]
    pub semester: String,
    pub course_code: String,
    pub credit_hours: u32,
    pub obtained_marks: u32,
    pub grade: String,
    pub quality_points: Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterSummary {
    pub semester: String,
    /// Rounded to 3 places.
    pub gpa: Fixed,
    pub subjects: Vec<CourseRecord>,
}

/// The complete aggregated result for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTranscript {
    pub student_name: String,
    pub registration_no: String,
    /// Rounded to 5 places.
    pub cgpa: Fixed,
    pub total_credit_hours: u64,
    pub total_quality_points: Fixed,
    pub semesters: Vec<SemesterSummary>,
}

impl StudentTranscript {
    /// Number of distinct courses across all semesters.
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.subjects.len()).sum()
    }

    /// `{ success: true, ...transcript }`
    pub fn report(&self) -> TranscriptReport<'_> {
        TranscriptReport {
            success: true,
            transcript: self,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptReport<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub transcript: &'a StudentTranscript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_number_is_trimmed() {
        let reg = RegistrationNumber::parse("  2022-ag-7755 \n").unwrap();
        assert_eq!(reg.as_str(), "2022-ag-7755");
    }

    #[test]
    fn test_blank_registration_number_rejected() {
        assert_eq!(
            RegistrationNumber::parse("   "),
            Err(EngineError::MissingRegistration)
        );
        assert_eq!(
            RegistrationNumber::parse(""),
            Err(EngineError::MissingRegistration)
        );
    }

    #[test]
    fn test_course_record_serializes_without_semester() {
        let record = CourseRecord {
            semester: "1".into(),
            course_code: "CS101".into(),
            credit_hours: 3,
            obtained_marks: 54,
            grade: "A".into(),
            quality_points: Fixed::new(1200, 2),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "courseCode": "CS101",
                "creditHours": 3,
                "obtainedMarks": 54,
                "grade": "A",
                "qualityPoints": 12.0
            })
        );
    }
}

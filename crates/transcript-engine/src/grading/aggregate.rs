//! Deduplication, semester grouping, GPA and CGPA.

use super::fixed::Fixed;
use super::quality::{quality_points, QUALITY_POINT_SCALE};
use crate::model::{CourseAttempt, CourseRecord, SemesterSummary};
use std::collections::HashMap;

/// Decimal places kept for a semester GPA.
pub const GPA_SCALE: u32 = 3;

/// Decimal places kept for the CGPA.
pub const CGPA_SCALE: u32 = 5;

/// Semesters plus the overall totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub semesters: Vec<SemesterSummary>,
    pub total_credit_hours: u64,
    pub total_quality_points: Fixed,
    pub cgpa: Fixed,
}

/// Aggregate attempts in table order.
///
/// Pass-only attempts are dropped first. Among attempts sharing a course
/// code the one with strictly greater marks wins; ties keep the earlier
/// one. The winner takes the slot of the first attempt at that course.
pub fn aggregate(attempts: &[CourseAttempt]) -> Aggregate {
    let records = deduplicate(attempts);
    let semesters = group_by_semester(records);

    let (total_credit_hours, total_quality_points) = semesters
        .iter()
        .flat_map(|s| s.subjects.iter())
        .fold(
            (0u64, Fixed::zero(QUALITY_POINT_SCALE)),
            |(ch, qp), r| (ch + u64::from(r.credit_hours), qp + r.quality_points),
        );

    Aggregate {
        cgpa: average(total_quality_points, total_credit_hours, CGPA_SCALE),
        semesters,
        total_credit_hours,
        total_quality_points,
    }
}

/// Keep the best attempt per course code, in first-seen order.
pub fn deduplicate(attempts: &[CourseAttempt]) -> Vec<CourseRecord> {
    let mut records: Vec<CourseRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for attempt in attempts.iter().filter(|a| !a.is_pass_only()) {
        match index.get(attempt.course_code.as_str()) {
            Some(&slot) => {
                if attempt.obtained_marks > records[slot].obtained_marks {
                    records[slot] = to_record(attempt);
                }
            }
            None => {
                index.insert(attempt.course_code.as_str(), records.len());
                records.push(to_record(attempt));
            }
        }
    }

    records
}

fn to_record(attempt: &CourseAttempt) -> CourseRecord {
    CourseRecord {
        semester: attempt.semester.clone(),
        course_code: attempt.course_code.clone(),
        credit_hours: attempt.credit_hours,
        obtained_marks: attempt.obtained_marks,
        grade: attempt.grade.clone(),
        quality_points: quality_points(attempt.obtained_marks, attempt.credit_hours),
    }
}

/// Partition records by semester label, semesters in first-occurrence order.
fn group_by_semester(records: Vec<CourseRecord>) -> Vec<SemesterSummary> {
    let mut groups: Vec<(String, Vec<CourseRecord>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.semester.clone()).or_insert_with(|| {
            groups.push((record.semester.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
        .into_iter()
        .map(|(semester, subjects)| {
            let credit_hours: u64 = subjects.iter().map(|s| u64::from(s.credit_hours)).sum();
            let quality = subjects
                .iter()
                .fold(Fixed::zero(QUALITY_POINT_SCALE), |acc, s| acc + s.quality_points);
            SemesterSummary {
                gpa: average(quality, credit_hours, GPA_SCALE),
                semester,
                subjects,
            }
        })
        .collect()
}

/// `quality / credit_hours` at `scale` places, 0 when there are no credit hours.
fn average(quality: Fixed, credit_hours: u64, scale: u32) -> Fixed {
    debug_assert_eq!(quality.scale(), QUALITY_POINT_SCALE);
    // quality.units() is in hundredths
    Fixed::from_ratio(quality.units(), credit_hours * 100, scale)
}

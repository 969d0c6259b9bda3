//! Parse the portal's result page into identity fields and course rows.
//!
//! The page has one `table.table.tab-content` holding both the student's
//! identity rows and the course grid. Column positions of the grid are
//! fixed by the portal layout:
//!
//! | col | content       |
//! |-----|---------------|
//! | 1   | semester      |
//! | 3   | course code   |
//! | 5   | credit hours  |
//! | 10  | total marks   |
//! | 11  | grade         |

use crate::error::EngineError;
use crate::model::{CourseAttempt, RegistrationNumber};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// CSS selector for the result container.
pub const RESULT_CONTAINER_SELECTOR: &str = ".table.tab-content";

/// A course row needs more than this many cells.
const MIN_ROW_CELLS: usize = 11;

const COL_SEMESTER: usize = 1;
const COL_COURSE_CODE: usize = 3;
const COL_CREDIT_HOURS: usize = 5;
const COL_OBTAINED_MARKS: usize = 10;
const COL_GRADE: usize = 11;

/// Identity and course rows lifted from a result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    pub student_name: String,
    pub registration_no: String,
    pub attempts: Vec<CourseAttempt>,
}

struct Selectors {
    container: Selector,
    row: Selector,
    cell: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        container: Selector::parse(RESULT_CONTAINER_SELECTOR).expect("container selector is valid"),
        row: Selector::parse("tr").expect("row selector is valid"),
        cell: Selector::parse("td").expect("cell selector is valid"),
    })
}

struct Patterns {
    registration: Regex,
    name_label: Regex,
    next_label: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        registration: Regex::new(r"(?i)Registration\s*#\s*:?\s*([^\s:]+)")
            .expect("registration regex is valid"),
        name_label: Regex::new(r"(?i)Student\s+Full\s+Name\s*:?").expect("name regex is valid"),
        // The course grid header starts "Sr Semester ...", so stop there too.
        next_label: Regex::new(
            r"(?i)\bRegistration\b|Student\s+Full\s+Name|\bSr\b\.?\s+Semester\b|\bSemester\b",
        )
        .expect("label regex is valid"),
    })
}

/// Whether the page contains a result container at all.
pub fn has_result_table(html: &str) -> bool {
    let document = Html::parse_document(html);
    document.select(&selectors().container).next().is_some()
}

/// Parse a result page.
///
/// `submitted` is used as the registration number when the page does not
/// print one.
pub fn parse_result_page(
    html: &str,
    submitted: &RegistrationNumber,
) -> Result<ParsedResult, EngineError> {
    let document = Html::parse_document(html);
    let sel = selectors();

    let container = document
        .select(&sel.container)
        .next()
        .ok_or(EngineError::NoResultTable)?;

    let text = element_text(&container);
    let student_name = extract_student_name(&text);
    if student_name.is_empty() {
        return Err(EngineError::InvalidRegistration);
    }
    let registration_no =
        extract_registration_no(&text).unwrap_or_else(|| submitted.as_str().to_string());

    let mut attempts = Vec::new();
    let mut skipped = 0usize;
    for row in container.select(&sel.row).skip(1) {
        let cells: Vec<String> = row.select(&sel.cell).map(|c| element_text(&c)).collect();
        match course_from_cells(&cells) {
            Some(attempt) if attempt.is_pass_only() => skipped += 1,
            Some(attempt) => attempts.push(attempt),
            None => skipped += 1,
        }
    }

    debug!(
        registration_no = %registration_no,
        courses = attempts.len(),
        skipped,
        "parsed result table"
    );

    Ok(ParsedResult {
        student_name,
        registration_no,
        attempts,
    })
}

/// Build a course attempt from one row's cell texts, if it is a course row.
pub fn course_from_cells(cells: &[String]) -> Option<CourseAttempt> {
    if cells.len() <= MIN_ROW_CELLS {
        return None;
    }
    Some(CourseAttempt {
        semester: cells[COL_SEMESTER].clone(),
        course_code: cells[COL_COURSE_CODE].clone(),
        credit_hours: leading_int(&cells[COL_CREDIT_HOURS]),
        obtained_marks: leading_int(&cells[COL_OBTAINED_MARKS]),
        grade: cells[COL_GRADE].clone(),
    })
}

/// Text following "Student Full Name" up to the next label or end of text.
pub fn extract_student_name(text: &str) -> String {
    let p = patterns();
    let Some(label) = p.name_label.find(text) else {
        return String::new();
    };
    let rest = &text[label.end()..];
    let end = p
        .next_label
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// First token following "Registration #".
pub fn extract_registration_no(text: &str) -> Option<String> {
    patterns()
        .registration
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Leading decimal digits of `text`, or 0. `"3(2-1)"` reads as 3.
/// Runs too long for `u32` saturate.
fn leading_int(text: &str) -> u32 {
    let trimmed = text.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or_else(|_| {
        debug!(cell = trimmed, "numeric cell overflows u32, saturating");
        u32::MAX
    })
}

/// Element text with whitespace runs collapsed to single spaces.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

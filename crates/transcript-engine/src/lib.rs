// Copyright 2026 Transcript Engine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Transcript engine: fetch a student's result sheet from the university
//! LMS portal and compute per-semester GPA and overall CGPA.
//!
//! The single entry point is [`TranscriptEngine::submit_registration_number`].

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod grading;
pub mod model;
pub mod renderer;
pub mod rest;

pub use config::{EngineConfig, TransportKind};
pub use engine::{outcome_json, EngineResult, TranscriptEngine};
pub use error::{EngineError, ErrorReport, Severity};
pub use model::{CourseAttempt, CourseRecord, RegistrationNumber, SemesterSummary, StudentTranscript};

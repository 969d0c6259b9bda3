//! Quality points and GPA/CGPA aggregation.
//!
//! Pure functions only; nothing in here touches the network.

pub mod aggregate;
pub mod fixed;
pub mod quality;

pub use aggregate::{aggregate, Aggregate};
pub use fixed::Fixed;
pub use quality::quality_points;

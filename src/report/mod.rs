pub mod generator;
pub mod stats;

pub use generator::{generate_report, generate_trends, render_status, ReportInputs};

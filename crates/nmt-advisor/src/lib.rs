//! NMT score estimation and admission chance analysis.
//!
//! The [`scoring`] module turns applicant answers and school grades into a blended
//! NMT estimate, [`admissions`] aggregates historical competition data and classifies
//! an applicant's chances, and [`artifacts`] owns loading of models and datasets.

pub mod admissions;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

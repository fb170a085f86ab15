//! End-to-end tests for the enaml-build pipeline.

mod common;
mod pipeline_tests;
mod project_tests;

pub mod generator;
pub mod report_model;
pub mod step;

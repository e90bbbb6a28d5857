pub mod cancel;
pub mod explorer;
pub mod flow;
pub mod frontier;
pub mod run_model;

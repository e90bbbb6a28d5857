pub mod fingerprint;
pub mod identity;
pub mod state_model;

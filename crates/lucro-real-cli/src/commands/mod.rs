pub mod alerts;
pub mod analysis;
pub mod diagnosis;
pub mod intake;
pub mod metrics;

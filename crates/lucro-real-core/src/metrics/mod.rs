pub mod break_even;
pub mod profit;
pub mod simulation;

pub mod growth;
pub mod health;
pub mod risk;

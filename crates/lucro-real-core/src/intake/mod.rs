pub mod onboarding;
pub mod parse;

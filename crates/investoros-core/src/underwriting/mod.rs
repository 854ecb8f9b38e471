pub mod calculator;
pub mod deal;
pub mod rules;

pub use calculator::{analyze_deal, underwrite, UnderwritingResult};
pub use deal::DealInput;

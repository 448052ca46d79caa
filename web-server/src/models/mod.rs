//! Request / response bodies

pub mod assessment;
pub mod history;

pub use assessment::*;
pub use history::*;

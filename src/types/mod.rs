pub mod chart;
pub mod palette;
pub mod report;
pub mod workout;

pub mod cache;
pub mod chart;
pub mod dashboard;
pub mod evolution;
pub mod money;
pub mod month;
pub mod page;
pub mod portfolio;
pub mod range;
pub mod savings;
pub mod series;
pub mod settings;
pub mod snapshot;

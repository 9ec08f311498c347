pub mod dashboard;
pub mod evolution;
pub mod savings;
pub mod selection;

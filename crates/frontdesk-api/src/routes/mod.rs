pub mod catalog;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod live;
pub mod queue;
pub mod reports;

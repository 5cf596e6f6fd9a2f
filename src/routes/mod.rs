pub mod competitors;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod trends;

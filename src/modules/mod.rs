pub mod audit;
pub mod operations;
pub mod profile;
pub mod roles;
pub mod system;
pub mod tasks;
pub mod users;

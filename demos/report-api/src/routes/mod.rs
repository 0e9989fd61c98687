pub mod master;
pub mod report;
pub mod transaction;

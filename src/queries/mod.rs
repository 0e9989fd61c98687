//! Query modules for the stock database.
//!
//! Each read interface borrows a [`Connection`](crate::connection::Connection);
//! write interfaces borrow it mutably so they can open a unit of work.

pub mod master;
pub mod report;

pub use master::{MasterDataQuery, MasterDataSync};
pub use report::ReportQuery;

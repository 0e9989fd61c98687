pub(crate) mod de;
pub mod master;
pub mod payload;
pub mod report;

pub use master::*;
pub use payload::*;
pub use report::*;

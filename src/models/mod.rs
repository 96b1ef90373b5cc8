pub mod license;
pub mod record;
pub mod totals;

pub use license::*;
pub use record::*;
pub use totals::*;

pub mod context;
pub mod naming;

pub use context::*;
pub use naming::*;

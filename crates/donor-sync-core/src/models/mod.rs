//! Domain models for the donor-sync system.

mod availability;
mod donor;
mod payload;
mod reference;
mod session;

pub use availability::*;
pub use donor::*;
pub use payload::*;
pub use reference::*;
pub use session::*;

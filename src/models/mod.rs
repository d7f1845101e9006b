//! Register entries and the values they carry.

pub mod amount;
pub mod appointment;
pub mod dismissal;
pub mod entry;
pub mod experience;

pub use amount::Amount;
pub use appointment::{Appointment, Currency};
pub use dismissal::Dismissal;
pub use entry::{Entry, EntryBase, EntryType};
pub use experience::Experience;

pub use super::appointments::Entity as Appointments;
pub use super::dismissals::Entity as Dismissals;
pub use super::entries::Entity as Entries;

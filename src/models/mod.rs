//! Domain model modules.

pub mod entry;
pub mod notification;
pub mod patient;
pub mod template;

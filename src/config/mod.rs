// Configuration modules for the VMS backend

pub mod permissions;

pub use permissions::{AdminRole, Permission, Role};

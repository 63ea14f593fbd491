//! Built-in vendor platform definitions.

pub mod cisco_ios;
pub mod generic;
pub mod omnistack;

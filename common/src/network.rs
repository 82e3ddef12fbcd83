pub mod address;
pub mod port;

pub mod bcast;
pub mod sock;

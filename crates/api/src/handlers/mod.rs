pub mod gate;
pub mod requests;
pub mod spots;
pub mod tickets;

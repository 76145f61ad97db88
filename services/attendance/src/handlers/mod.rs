pub mod account;
pub mod approval;
pub mod catalog;
pub mod checkin;
pub mod roster;
pub mod session;
pub mod window;

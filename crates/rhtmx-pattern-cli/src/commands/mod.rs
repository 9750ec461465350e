pub mod check;
pub mod matches;
pub mod resolve;
pub mod route;

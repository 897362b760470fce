pub mod fixture;
pub mod session;
pub mod ui_driver;

pub mod check;
pub mod debug;

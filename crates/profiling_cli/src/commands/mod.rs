pub mod check;
pub mod dimensions;
pub mod run;

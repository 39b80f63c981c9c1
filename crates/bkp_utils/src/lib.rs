pub mod sync;
pub mod term;

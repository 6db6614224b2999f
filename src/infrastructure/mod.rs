pub mod appearance;
pub mod persistence;

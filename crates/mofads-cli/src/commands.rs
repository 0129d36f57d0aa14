pub mod batch;
pub mod place;
pub mod species;

mod output;

pub mod model;
pub mod release;

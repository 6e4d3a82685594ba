pub mod macro_data;
pub mod response;

pub use macro_data::*;
pub use response::*;

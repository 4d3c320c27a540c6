mod convert;
mod value;


pub use convert::{to_number, to_str};
pub use value::{HostValue, ObjectModel, Shape, Val};

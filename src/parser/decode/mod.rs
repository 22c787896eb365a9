pub mod dates;
pub mod links;
pub mod percent;

pub use dates::parse_opdrts;
pub use links::parse_pollster;
pub use percent::parse_percent;

pub use area::*;
pub use locate::*;
pub use search::*;

mod area;
mod locate;
mod search;

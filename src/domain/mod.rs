pub mod announcement;
pub mod clock;

pub use announcement::*;
pub use clock::*;

pub mod motion;
pub use motion::*;

pub mod video;
pub use video::*;

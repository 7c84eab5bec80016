pub mod catalog;
pub mod history;
pub mod image;
pub mod options;

pub use catalog::*;
pub use history::*;
pub use image::*;
pub use options::*;

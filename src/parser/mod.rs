pub mod block;
pub mod extractor;
pub mod locator;
pub mod main;

pub use block::*;
pub use extractor::*;
pub use locator::*;
pub use main::*;

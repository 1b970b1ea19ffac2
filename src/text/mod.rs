pub mod split;

pub use split::{CharSpan, SplitText};

mod output;

pub use output::{OutputTarget, TiffOutputStream};

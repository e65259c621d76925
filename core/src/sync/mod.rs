pub mod sink;

pub use sink::{GestureSink, JsonFileSink};

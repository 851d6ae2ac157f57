mod debug;

pub use debug::{classify_debug_enabled, set_classify_debug};

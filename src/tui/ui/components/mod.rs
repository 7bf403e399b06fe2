pub mod kv_line;

pub use kv_line::{render_kv_line, TextState};

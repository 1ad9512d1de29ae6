pub mod markdown;
pub mod tree;
pub mod writer;

pub use markdown::render;
pub use tree::render_tree;
pub use writer::ReportWriter;

pub(crate) mod text;

pub use text::single_line;

pub mod text;
pub mod renderer;

pub use renderer::{CharsetProfile, TextRenderer};
pub use text::{display_width, truncate_to_width};

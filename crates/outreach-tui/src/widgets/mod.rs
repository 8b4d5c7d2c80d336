//! Small rendering helpers shared by the screens.

pub mod key_hints;
pub mod status_badge;
pub mod text_field;

pub use key_hints::hint_line;
pub use status_badge::status_badge;
pub use text_field::TextField;

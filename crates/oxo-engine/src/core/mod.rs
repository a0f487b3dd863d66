pub use self::{board::*, cell::*, cursor::*, line_state::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod cursor;
pub(crate) mod line_state;

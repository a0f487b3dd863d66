pub use self::{controller::*, player::*, preferences::*};

pub mod controller;
pub mod player;
pub mod preferences;

mod worker;

//! The "no" button that never lets itself be clicked.

pub mod button;
pub mod geom;
pub mod rng;

pub use button::{
    ButtonGeometry, InstanceAttrs, Proximity, Reaction, RunawayButton, RunawayParams,
};
pub use geom::Rect;
pub use rng::Rng;

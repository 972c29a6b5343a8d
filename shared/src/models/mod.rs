//! Domain models for the weather dashboard

mod climate;
mod favorite;
mod recommendation;
mod template;
mod widget;

pub use climate::*;
pub use favorite::*;
pub use recommendation::*;
pub use template::*;
pub use widget::*;

//! Client-side table over one fetched page
//!
//! [`TableState`] owns every piece of view state and changes only through its
//! command methods. The rendered window is re-derived from the fetched rows on
//! each call to [`TableState::view`]: filter by author, sort, then cut to the
//! page size.

mod column;
mod controller;
mod sort;
mod state;
mod view;

pub use column::*;
pub use controller::*;
pub use sort::*;
pub use state::*;
pub use view::*;

//! Application State: zentrale Datenhaltung einer Karten-Session.

mod app_state;
mod view;

pub use app_state::{AppState, InteractionState};
pub use view::ViewState;

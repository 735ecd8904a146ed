//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

mod command;
mod intent;

pub use command::AppCommand;
pub use intent::AppIntent;

use crate::surface::QueryCompletion;

impl From<QueryCompletion> for AppIntent {
    fn from(completion: QueryCompletion) -> Self {
        AppIntent::SpatialQueryCompleted {
            ticket: completion.ticket,
            outcome: completion.outcome,
        }
    }
}

// Wed Jan 14 2026 - Alex

pub mod traveltime;
pub mod velocity;

pub use traveltime::{half_offset, project, travel_time, MoveoutTerms};
pub use velocity::{VelocityEntry, VelocityTable};

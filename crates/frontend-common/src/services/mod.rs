//! View-model services over the API client
//!
//! Services convert wire DTOs into the view models in `trabuddy_core`,
//! parsing and formatting timestamps on the way.

pub mod plan;
pub mod tour;
pub mod user;

pub use plan::{PlanService, PlanUpdate};
pub use tour::{AreaCache, TourService};
pub use user::UserService;

//! Routing, session guard and view-model services shared by the Trabuddy
//! web front end

pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod fixtures;
pub mod guard;
pub mod logging;
pub mod router;
pub mod services;

pub use app::{Platform, TrabuddyApp};
pub use guard::RouteGuard;
pub use router::{Location, NavigationDecision, Route};
pub use services::{AreaCache, PlanService, TourService, UserService};

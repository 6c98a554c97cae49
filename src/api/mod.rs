//! HTTP API for the Duty Roster Engine.
//!
//! Endpoints:
//!
//! - `POST /roster`: solve a month (`{"year": 2025, "month": 2}`); 503 while
//!   solver threads are saturated
//! - `POST /export/ics`: render a schedule as iCalendar
//! - `POST /export/csv`: render a schedule as CSV

pub mod handlers;
pub mod request;
pub mod response;
pub mod state;

pub use handlers::create_router;
pub use request::{PeriodValue, RosterRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, DEFAULT_MAX_SOLVER_WORKERS};

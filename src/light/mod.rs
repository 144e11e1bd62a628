//! Light Registry
//!
//! A bounded registry of on/off lights. Lights are addressed by a 1-based
//! `index` that always runs contiguously up to the number of registered
//! lights, and at most `capacity` of them (8 by default) exist at once.
//!
//! # Routes
//!
//! | Method | Path                 | Effect                                  |
//! |--------|----------------------|-----------------------------------------|
//! | GET    | `/lightcount`        | number of lights                        |
//! | GET    | `/lights`            | all lights, or a placeholder when empty |
//! | GET    | `/getlight/:id`      | one light by index, or `null`           |
//! | POST   | `/createlight`       | append a light (switched off)           |
//! | POST   | `/updatelight/:id`   | set `status` of one light               |
//! | POST   | `/deletelight`       | remove the highest-indexed light        |
//!
//! # Usage
//!
//! ```rust,ignore
//! use lamplighter::light;
//!
//! let app = Router::new()
//!     .nest("/api/v1", light::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod registry;
mod routes;

pub use handler::{CAPACITY_MESSAGE, CREATED_MESSAGE, DELETED_MESSAGE, NOTHING_TO_DELETE_MESSAGE};
pub use registry::{DEFAULT_CAPACITY, LightRegistry, MAX_NAME_LEN, coerce_index};
pub use routes::routes;

//! Application services
//!
//! Concrete service implementations that talk to the management API.
//! Services depend on I/O boundary traits (HttpTransport)
//! but are themselves concrete structs, not traits.

mod management;

pub use management::ManagementService;

// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod attendance;
pub mod registry;

pub use attendance::AttendanceService;
pub use registry::EventRegistry;

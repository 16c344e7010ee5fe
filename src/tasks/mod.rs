//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweeper: reclaims store entries past the life window and closed
//!   admission windows

mod sweeper;

pub use sweeper::spawn_sweeper_task;

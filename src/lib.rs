//! Protocol Adherence - adherence tracking and phase gating for
//! reprocessing-therapy action plans.
//!
//! Computes expected task occurrences from daily, weekly and custom weekday
//! schedules, compares them with completion logs, and controls which protocol
//! phases a patient can access.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

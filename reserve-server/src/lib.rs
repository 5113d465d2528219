//! Train reservation server.
//!
//! A web API over two carrier booking systems (SRT and KTX) that
//! searches schedules, attempts reservations and reports sold-out as a
//! retryable answer, lists, pays and cancels bookings, and pushes a
//! notification when a reservation succeeds.

pub mod backend;
pub mod carrier;
pub mod config;
pub mod domain;
pub mod matcher;
pub mod notify;
pub mod outcome;
pub mod reserve;
pub mod stations;
pub mod web;

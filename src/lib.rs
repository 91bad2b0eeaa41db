//! Continuing-education credit eligibility service for long-term-care
//! professionals.
//!
//! The heart of the crate is [`credits::calculator`], a pure aggregation and
//! rule engine over a member's raw credit sheet. Everything around it —
//! document extraction, identity verification, result delivery, and course
//! recommendations — is an injected collaborator behind a trait so the engine
//! stays free of I/O.

pub mod config;
pub mod credits;
pub mod error;
pub mod telemetry;

//! Tollgate - Per-Tenant Rate Limiting
//!
//! This crate implements a fixed-window rate limiter keyed by tenant and an
//! optional accounting group. Limits are resolved through four override
//! layers (tenant+group override, tenant override, group default, base
//! limit) and tracked in per-key windows whose quota resets wholesale at
//! period boundaries.

pub mod config;
pub mod error;
pub mod ratelimit;

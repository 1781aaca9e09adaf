//! Dead-man's switch supervisor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation. All hardware access goes through the port traits in
//! [`hal`], so the crate carries no target-specific code; a real target
//! supplies its own adapter module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod drivers;
pub mod events;
pub mod hal;
pub mod lockdown;
pub mod storage;
pub mod supervisor;

pub mod error;

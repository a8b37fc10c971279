//! Personal wellness tracker for daily yoga, diet and walking goals.
//! Keeps one completion record per calendar day, mirrors the whole store to a
//! per-user remote document after every change, and derives the progress
//! numbers the views show.
//!

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod engine;
pub mod remote;
pub mod utils;

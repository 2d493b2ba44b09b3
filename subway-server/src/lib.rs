//! Subway network server.
//!
//! Keeps a set of stations and lines, where each line is a single path of
//! sections. Sections can be added anywhere along a line, splitting an
//! existing section when the new one falls inside it, and stations can be
//! taken off a line with the neighbouring sections merged. Fares are quoted
//! from the distance travelled plus the line's surcharge.

pub mod config;
pub mod domain;
pub mod repository;
pub mod service;
pub mod web;

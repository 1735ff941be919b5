//! Headless driver for the physics core: loads JSON scenes, feeds scripted
//! input and steps the simulation.

pub mod app;
pub mod scene;

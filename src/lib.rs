//! Command runtime for the FUTBOT two-motor car.
//!
//! Lines from a driver (Bluetooth serial or zenoh) are decoded into
//! commands, turned into PWM duties for the two motors and into directives
//! for the OLED, with a watchdog that stops the car when the driver goes
//! quiet or drops the link.

pub mod command;
pub mod config;
pub mod controller;
pub mod display;
pub mod messages;
pub mod motor;
pub mod runtime;
pub mod transport;

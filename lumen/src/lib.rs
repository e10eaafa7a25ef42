/**
Lumen drives a single machine vision camera through a vendor SDK for bench
calibration work. The crate keeps the same split used across our device
software: devices wrap the SDK and are the only place hardware is touched,
components compose devices into a procedure (here the exposure sweep), and
messages define what leaves the process for an operator to read.
*/

/// Components in the system are created by grouping together
/// devices into a logical unit that performs some function,
/// in this case a calibration procedure.
pub mod components;
/// Devices that are an atomic unit, and the SDK abstraction
/// that hides which vendor library is driving them.
pub mod devices;
/// Message structure for what the procedures report back out
/// to the operator.
pub mod messages;
/// Development utilities for working with pixel encodings,
/// frame statistics and test fixtures.
pub mod utils;

//! Integration tests for the lunacheck workspace
//!
//! Runs the real scenario scripts through the real runner against the
//! in-process mock service, proving the suite passes end to end before it
//! ever touches a device.

//! jj integration for jjview.
//!
//! A single background `std::thread` runs every jj invocation in request
//! order and parses the output before handing it to the UI loop, so the
//! terminal never blocks on a subprocess.
pub mod runner;
pub mod types;
pub mod worker;

//! Component 3 – C artifacts for the SGDK build.
//!
//! Every writer renders into memory first and only touches the
//! filesystem once the whole artifact is ready.
pub mod c;
pub mod collision;
pub mod slopes;

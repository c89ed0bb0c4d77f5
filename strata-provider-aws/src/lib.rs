//! Strata AWS Provider
//!
//! Framework types shared by AWS resource schemas: typed sets, ARNs and
//! string enumerations.

pub mod enums;
pub mod fwtypes;

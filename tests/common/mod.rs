#![allow(dead_code)]

pub mod stubs;
pub mod synthetic_road;

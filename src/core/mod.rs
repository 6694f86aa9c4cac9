// src/core/mod.rs

pub mod fsx;
pub mod hex;
pub mod html;
pub mod net;
pub mod os;
pub mod prompt;
pub mod sanitize;
pub mod time;

#![allow(dead_code)]

pub mod fakes;
pub mod helpers;
pub mod http_stub;

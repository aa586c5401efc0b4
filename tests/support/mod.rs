#![allow(dead_code)]

pub mod qdiag_env;
pub mod stub_server;

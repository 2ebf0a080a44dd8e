//! System-level modules
//!
//! 目前只包含日志初始化。

pub mod logging;

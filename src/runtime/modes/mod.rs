//! Mode routing
//!
//! Server 与 CLI 两种入口，按命令行参数和 feature 选择。

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run based on command-line arguments
///
/// - 无参数或首个参数为 `serve` -> Server
/// - 其他参数且启用 cli -> CLI（由 clap 负责报错与帮助）
/// - 未启用任何 feature -> Unknown
pub fn detect_mode(args: &[String]) -> Mode {
    #[cfg(feature = "server")]
    if args.len() <= 1 || args[1] == "serve" {
        return Mode::Server;
    }

    #[cfg(feature = "cli")]
    if args.len() > 1 {
        return Mode::Cli;
    }

    #[cfg(feature = "server")]
    return Mode::Server;

    #[cfg(not(feature = "server"))]
    Mode::Unknown
}

use cardshare::config::{get_config, init_config};
use cardshare::runtime::modes::{Mode, detect_mode};
use colored::Colorize;

#[tokio::main]
async fn main() {
    // .env 只作为环境变量来源，缺失不报错
    dotenvy::dotenv().ok();
    init_config();

    let args: Vec<String> = std::env::args().collect();

    match detect_mode(&args) {
        #[cfg(feature = "server")]
        Mode::Server => {
            let _guard = match cardshare::system::logging::init_logging(&get_config().logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{} {:#}", "Failed to initialize logging:".red().bold(), e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = cardshare::runtime::modes::run_server().await {
                match e.downcast_ref::<cardshare::errors::CardshareError>() {
                    Some(err) => eprintln!("{}", err.format_colored()),
                    None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
                }
                std::process::exit(1);
            }
        }
        #[cfg(feature = "cli")]
        Mode::Cli => {
            if let Err(e) = cardshare::runtime::modes::run_cli().await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
        Mode::Unknown => {
            eprintln!("No execution mode available: enable the `server` or `cli` feature");
            std::process::exit(1);
        }
    }
}

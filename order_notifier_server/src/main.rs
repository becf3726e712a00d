use dotenvy::dotenv;
use log::info;
use order_notifier_server::{cli::handle_command_line_args, config::NotifierConfig, server::run_server};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = NotifierConfig::from_env_or_default();

    info!("🚀️ Starting order notifier on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

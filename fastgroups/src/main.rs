use clap::Parser;

mod commands;
mod handlers;
mod output;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = commands::Cli::parse();
    if let Err(err) = handlers::handle_command(cli.command) {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
    Ok(())
}

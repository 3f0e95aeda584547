use std::process::ExitCode;
use clap::Parser as ClapParser;
use mint_lang::Config;

fn main() -> ExitCode {
    let config: Config = Config::parse();
    mint_lang::init_tracing(config.verbose);

    mint_lang::run(&config)
}

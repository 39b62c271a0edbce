use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "voicebrief")]
#[command(about = "Conference recording to summary email service", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the listen port from configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

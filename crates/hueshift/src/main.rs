use clap::Parser;
use hueshift::cli::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = agora::cli::Cli::parse();
    agora::cli::run(cli)?;
    Ok(())
}

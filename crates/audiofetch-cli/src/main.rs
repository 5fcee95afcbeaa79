use audiofetch_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_fetch};
use audiofetch_lib::error::AudioFetchError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), AudioFetchError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    // Per-file failures are already on stdout; they do not change the exit status.
    match command {
        ResolvedCommand::Fetch(params) => {
            run_fetch(params).await?;
        }
    }

    Ok(())
}

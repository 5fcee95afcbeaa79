mod args;
mod fetch;
mod params;
mod resolved_command;

pub use args::{Args, Command, parse_args, try_parse_args_from};
pub use fetch::run_fetch;
pub use params::FetchParams;
pub use resolved_command::{ResolvedCommand, resolve_command};

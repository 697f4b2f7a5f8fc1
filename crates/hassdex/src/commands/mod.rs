//! Command dispatch: bridges CLI args -> core pipeline -> output formatting.

pub mod config_cmd;
pub mod diff;
pub mod index;
pub mod report;
pub mod show;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Painter};

/// Output settings resolved once from flags and config.
pub struct Ctx {
    pub config: Config,
    pub format: OutputFormat,
    pub painter: Painter,
    pub quiet: bool,
}

impl Ctx {
    pub fn new(global: &GlobalOpts, config: Config) -> Self {
        let format = config::output_format(global, &config);
        let painter = Painter::new(output::should_color(config::color_mode(global, &config)));
        Self {
            config,
            format,
            painter,
            quiet: global.quiet,
        }
    }
}

/// Dispatch a snapshot command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Index(args) => index::handle(args, global, ctx).await,
        Command::Show(args) => show::handle(args, global, ctx),
        Command::Diff(args) => diff::handle(&args, ctx),
        Command::Config(args) => config_cmd::handle(args, global, ctx),
        // Completions are generated before dispatch
        Command::Completions(_) => Ok(()),
    }
}

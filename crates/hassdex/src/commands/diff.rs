//! `hassdex diff`: compare two snapshot files offline.

use hassdex_core::{SnapshotStore, compute_changes};

use crate::cli::DiffArgs;
use crate::error::CliError;
use crate::output;

use super::{Ctx, report};

pub fn handle(args: &DiffArgs, ctx: &Ctx) -> Result<(), CliError> {
    let old = SnapshotStore::load(&args.old)?;
    let new = SnapshotStore::load(&args.new)?;

    let changes = compute_changes(&new, Some(&old));
    let out = output::render_single(
        ctx.format,
        &changes,
        |c| report::changes(c, ctx.painter),
        report::changes_plain,
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

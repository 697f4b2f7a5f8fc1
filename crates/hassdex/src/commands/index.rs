//! `hassdex index`: run the pipeline and report.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use hassdex_core::{ChangeSet, IndexOutcome, Indexer, Issues, RunOptions, Summary};

use crate::cli::{GlobalOpts, IndexArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::progress::Progress;

use super::{Ctx, report};

/// Structured form of the end-of-run report.
#[derive(Debug, Serialize)]
struct IndexReport<'a> {
    summary: &'a Summary,
    issues: &'a Issues,
    changes: &'a ChangeSet,
}

pub async fn handle(args: IndexArgs, global: &GlobalOpts, ctx: &Ctx) -> Result<(), CliError> {
    let indexer_config = config::resolve_indexer_config(global, &ctx.config)?;
    let indexer = Indexer::new(indexer_config);
    debug!(
        index = %indexer.store().current_path().display(),
        previous = %indexer.store().previous_path().display(),
        "snapshot paths"
    );

    let started = Instant::now();
    let mut progress = Progress::new(ctx.quiet);
    let result = indexer
        .run(
            RunOptions {
                dry_run: args.dry_run,
            },
            &mut progress,
        )
        .await;
    progress.finish();
    let outcome = result?;
    let elapsed = started.elapsed();

    let snapshot = &outcome.snapshot;
    let data = IndexReport {
        summary: &snapshot.summary,
        issues: &snapshot.issues,
        changes: &snapshot.changes_since_last,
    };
    let out = output::render_single(
        ctx.format,
        &data,
        |_| human_report(&indexer, &outcome, elapsed, ctx),
        |r| report::changes_plain(r.changes),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

fn human_report(indexer: &Indexer, outcome: &IndexOutcome, elapsed: Duration, ctx: &Ctx) -> String {
    let painter = ctx.painter;
    let destination = if outcome.written {
        format!(
            "Written to: {}",
            indexer.store().current_path().display()
        )
    } else {
        painter.dim("Dry run: snapshot not written")
    };
    // Millisecond precision is plenty for a human.
    let took = Duration::new(elapsed.as_secs(), elapsed.subsec_millis() * 1_000_000);

    format!(
        "\n{}\n{destination}\nTook: {}\n\n{}",
        report::totals(&outcome.snapshot, painter),
        humantime::format_duration(took),
        report::changes(&outcome.snapshot.changes_since_last, painter),
    )
}

//! Progress reporting for `hassdex index`.
//!
//! On a terminal: an `indicatif` spinner per stage that turns into a bar
//! while devices are fetched. Otherwise: one stderr line per stage and a
//! periodic device counter, so logs stay readable.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use hassdex_core::{BuildProgress, DEVICE_PROGRESS_INTERVAL, IndexStage};

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

pub struct Progress {
    mode: Mode,
}

enum Mode {
    Silent,
    Lines,
    Bar(ProgressBar),
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        let mode = if quiet {
            Mode::Silent
        } else if io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            Mode::Bar(bar)
        } else {
            Mode::Lines
        };
        Self { mode }
    }

    /// Clear the bar so the final report starts on a clean line.
    pub fn finish(&self) {
        if let Mode::Bar(bar) = &self.mode {
            bar.finish_and_clear();
        }
    }
}

impl BuildProgress for Progress {
    fn stage(&mut self, stage: IndexStage) {
        match &self.mode {
            Mode::Silent => {}
            Mode::Lines => eprintln!("{stage}..."),
            Mode::Bar(bar) => {
                if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
                    bar.set_style(style);
                }
                bar.set_message(format!("{stage}..."));
            }
        }
    }

    fn device(&mut self, index: usize, total: usize) {
        match &self.mode {
            Mode::Silent => {}
            Mode::Lines => {
                if index % DEVICE_PROGRESS_INTERVAL == 0 {
                    eprintln!("  Processing device {}/{total}...", index + 1);
                }
            }
            Mode::Bar(bar) => {
                if index == 0 {
                    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                        bar.set_style(style.progress_chars("=> "));
                    }
                    bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
                }
                bar.set_position(u64::try_from(index + 1).unwrap_or(u64::MAX));
            }
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

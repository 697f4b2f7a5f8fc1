//! Human-readable renderings shared by `index`, `show` and `diff`.

use std::fmt::Write;

use tabled::Tabled;

use hassdex_core::{ChangeDelta, ChangeSet, Issues, Snapshot};

use crate::output::{Painter, render_table};

const RULE_WIDTH: usize = 50;

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Entities")]
    count: usize,
}

/// Totals block printed after an index run.
pub fn totals(snapshot: &Snapshot, painter: Painter) -> String {
    let s = &snapshot.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{}",
        painter.heading(&format!(
            "Index created: {} entities, {} devices, {} areas",
            s.total_entities, s.total_devices, s.total_areas
        ))
    );
    let _ = writeln!(out, "Automations: {}", s.total_automations);
    let _ = writeln!(out, "Unavailable entities: {}", count(s.unavailable_count, painter));
    let _ = writeln!(
        out,
        "Devices with issues: {}",
        count(snapshot.issues.devices_with_issues.len(), painter)
    );
    let _ = write!(out, "HA Version: {}", snapshot.ha_version);
    out
}

fn count(n: usize, painter: Painter) -> String {
    if n == 0 {
        n.to_string()
    } else {
        painter.warn(&n.to_string())
    }
}

/// Full summary view for `show summary`.
pub fn summary(snapshot: &Snapshot, painter: Painter) -> String {
    let s = &snapshot.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Location:     {}", painter.heading(&snapshot.location_name));
    let _ = writeln!(out, "HA version:   {}", snapshot.ha_version);
    let _ = writeln!(out, "Indexed at:   {}", snapshot.indexed_at);
    let _ = writeln!(
        out,
        "Entities:     {} ({} unavailable)",
        s.total_entities,
        count(s.unavailable_count, painter)
    );
    let _ = writeln!(
        out,
        "Devices:      {} ({} with issues)",
        s.total_devices,
        count(snapshot.issues.devices_with_issues.len(), painter)
    );
    let _ = writeln!(out, "Areas:        {}", s.total_areas);
    let _ = write!(out, "Automations:  {}", s.total_automations);

    if !s.domains.is_empty() {
        let rows: Vec<DomainRow> = s
            .domains
            .iter()
            .map(|(domain, count)| DomainRow {
                domain: domain.clone(),
                count: *count,
            })
            .collect();
        let _ = write!(out, "\n\n{}", render_table(&rows));
    }
    out
}

/// `key=value` lines for scripting.
pub fn summary_plain(snapshot: &Snapshot) -> String {
    let s = &snapshot.summary;
    let mut lines = vec![
        format!("indexed_at={}", snapshot.indexed_at),
        format!("ha_version={}", snapshot.ha_version),
        format!("total_entities={}", s.total_entities),
        format!("total_devices={}", s.total_devices),
        format!("total_areas={}", s.total_areas),
        format!("total_automations={}", s.total_automations),
        format!("unavailable_count={}", s.unavailable_count),
    ];
    lines.extend(s.domains.iter().map(|(d, n)| format!("domain.{d}={n}")));
    lines.join("\n")
}

pub fn issues(issues: &Issues, painter: Painter) -> String {
    if issues.unavailable_entities.is_empty() && issues.devices_with_issues.is_empty() {
        return painter.added("No issues: every entity is available.");
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        painter.heading(&format!(
            "Unavailable entities ({}):",
            issues.unavailable_entities.len()
        ))
    );
    for id in &issues.unavailable_entities {
        let _ = writeln!(out, "  {}", painter.warn(id));
    }
    let _ = write!(
        out,
        "{}",
        painter.heading(&format!(
            "Devices with issues ({}):",
            issues.devices_with_issues.len()
        ))
    );
    for name in &issues.devices_with_issues {
        let _ = write!(out, "\n  {}", painter.warn(name));
    }
    out
}

/// Change report. The first-index marker gets a one-line note.
pub fn changes(changes: &ChangeSet, painter: Painter) -> String {
    let Some(delta) = changes.delta() else {
        return painter.dim("First index: nothing to compare against.");
    };

    let mut out = String::new();
    let _ = write!(out, "{}", painter.heading("--- Changes since last index ---"));
    if let Some(ref at) = delta.previous_indexed_at {
        let _ = write!(out, "\n  {}", painter.dim(&format!("previous index: {at}")));
    }
    if delta.is_empty() {
        let _ = write!(out, "\n  No changes.");
        return out;
    }

    let e = &delta.entities;
    section(&mut out, "New entities", &e.added, |s| painter.added(s));
    section(&mut out, "Removed entities", &e.removed, |s| painter.removed(s));
    if !e.state_changed.is_empty() {
        let _ = write!(out, "\n  State changes: {}", e.state_changed.len());
        for change in &e.state_changed {
            let _ = write!(
                out,
                "\n    {}: {} -> {}",
                change.entity_id,
                painter.dim(&change.old_state),
                change.new_state
            );
        }
    }
    section(&mut out, "New devices", &delta.devices.added, |s| painter.added(s));
    section(&mut out, "Removed devices", &delta.devices.removed, |s| painter.removed(s));
    section(&mut out, "Went unavailable", &delta.unavailable.now_unavailable, |s| {
        painter.warn(s)
    });
    section(&mut out, "Came back online", &delta.unavailable.now_available, |s| {
        painter.added(s)
    });
    out
}

fn section(out: &mut String, label: &str, items: &[String], paint: impl Fn(&str) -> String) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n  {label}: {}", items.len());
    for item in items {
        let _ = write!(out, "\n    {}", paint(item));
    }
}

/// One change per line, diff-style: `+` added, `-` removed, `~` state
/// change, `!` went unavailable, `^` came back.
pub fn changes_plain(changes: &ChangeSet) -> String {
    changes.delta().map(delta_lines).unwrap_or_default()
}

fn delta_lines(delta: &ChangeDelta) -> String {
    let e = &delta.entities;
    let lines = e
        .added
        .iter()
        .map(|id| format!("+ {id}"))
        .chain(e.removed.iter().map(|id| format!("- {id}")))
        .chain(
            e.state_changed
                .iter()
                .map(|c| format!("~ {} {} {}", c.entity_id, c.old_state, c.new_state)),
        )
        .chain(delta.devices.added.iter().map(|n| format!("+device {n}")))
        .chain(delta.devices.removed.iter().map(|n| format!("-device {n}")))
        .chain(delta.unavailable.now_unavailable.iter().map(|id| format!("! {id}")))
        .chain(delta.unavailable.now_available.iter().map(|id| format!("^ {id}")));
    lines.collect::<Vec<_>>().join("\n")
}

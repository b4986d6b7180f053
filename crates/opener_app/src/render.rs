use opener_core::{AppViewModel, Notice, OpenTarget, RunPhase};

pub fn status_line(view: &AppViewModel) -> String {
    let phase = match view.phase {
        RunPhase::Idle => "Idle",
        RunPhase::Running => "Running",
        RunPhase::Paused => "Paused",
        RunPhase::Completed => "Completed",
    };
    let target = match view.config.target() {
        OpenTarget::Tab => "tabs",
        OpenTarget::Window => "windows",
    };
    let batch = match view.config.batch_size() {
        0 => "all".to_string(),
        size => size.to_string(),
    };

    let mut line = format!(
        "{} | {}/{} ({:.1}%) | opened {} | batch {} x{} {} | delay {:.1}-{:.1}s",
        phase,
        view.progress.position,
        view.progress.total,
        view.progress.progress_percent(),
        view.opened_positions.len(),
        batch,
        view.config.concurrency(),
        target,
        view.config.min_delay().as_secs_f64(),
        view.config.max_delay().as_secs_f64(),
    );
    if view.effective_len() != view.total_identifiers {
        line.push_str(&format!(
            " | lines {}-{} of {}",
            view.range.start, view.range.end, view.total_identifiers
        ));
    }
    if !view.duplicates.is_empty() {
        line.push_str(&format!(" | {} duplicates", view.duplicates.len()));
    }
    if view.popup_blocked {
        line.push_str(" | some URLs were blocked");
    }
    line
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::InvalidPattern { pattern, message } => {
            format!("Invalid filter {pattern:?}, showing unfiltered list: {message}")
        }
        Notice::NothingToOpen { len: 0, .. } => "Nothing to open: the list is empty.".to_string(),
        Notice::NothingToOpen { start, len } => {
            format!("Nothing to open: all {len} URLs up to position {start} are done.")
        }
        Notice::ContextsBlocked { .. } => {
            "Some URLs could not be opened (blocked or invalid). Type `dismiss` to hide this."
                .to_string()
        }
        Notice::StillStopping { .. } => {
            "The previous run is still stopping; try again in a moment.".to_string()
        }
    }
}

pub const HELP: &str = "\
Commands:
  <enter>            start / pause / resume / redo (toggle)
  start | pause | resume | continue | redo
  filter <regex>     keep matching URLs (empty clears)
  append <params>    append query parameters (empty clears)
  range <from> <to>  restrict to lines from..to
  batch <n>          URLs per run (0 = all)
  concurrency <n>    URLs per stride
  delay <min> <max>  pause between strides, seconds
  target tab|window
  list               show the effective list
  export             write urls.txt
  clear | dismiss | status | help | quit";

use opener_core::{delay_from_secs, ConfigPatch, Msg, OpenTarget};

/// A line typed in interactive mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    List,
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Msg::HotkeyPressed),
        "s" | "start" => Command::Dispatch(Msg::StartClicked),
        "p" | "pause" => Command::Dispatch(Msg::PauseClicked),
        "r" | "resume" => Command::Dispatch(Msg::ResumeClicked),
        "c" | "continue" => Command::Dispatch(Msg::ContinueClicked),
        "redo" => Command::Dispatch(Msg::RedoClicked),
        "x" | "export" => Command::Dispatch(Msg::ExportClicked),
        "clear" => Command::Dispatch(Msg::ClearClicked),
        "d" | "dismiss" => Command::Dispatch(Msg::WarningDismissed),
        "filter" => Command::Dispatch(Msg::FilterChanged(rest.to_string())),
        "append" => Command::Dispatch(Msg::AppendParamsChanged(rest.to_string())),
        "range" => {
            let [start, end] = two_numbers(rest)?;
            Command::Dispatch(Msg::RangeChanged { start, end })
        }
        "batch" => Command::Dispatch(Msg::ConfigChanged(ConfigPatch {
            batch_size: Some(number(rest)?),
            ..ConfigPatch::default()
        })),
        "concurrency" => Command::Dispatch(Msg::ConfigChanged(ConfigPatch {
            concurrency: Some(number(rest)?),
            ..ConfigPatch::default()
        })),
        "delay" => {
            let mut parts = rest.split_whitespace().map(seconds);
            let min = parts.next().ok_or("usage: delay <min> [max]")??;
            let max = parts.next().transpose()?.unwrap_or(min);
            Command::Dispatch(Msg::ConfigChanged(ConfigPatch {
                min_delay: Some(min),
                max_delay: Some(max),
                ..ConfigPatch::default()
            }))
        }
        "target" => {
            let target = match rest.to_ascii_lowercase().as_str() {
                "tab" => OpenTarget::Tab,
                "window" => OpenTarget::Window,
                _ => return Err("usage: target tab|window".to_string()),
            };
            Command::Dispatch(Msg::ConfigChanged(ConfigPatch {
                target: Some(target),
                ..ConfigPatch::default()
            }))
        }
        "l" | "list" => Command::List,
        "status" => Command::Status,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(command)
}

fn number(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("expected a non-negative whole number, got {text:?}"))
}

fn two_numbers(text: &str) -> Result<[usize; 2], String> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok([number(first)?, number(second)?]),
        _ => Err("usage: range <from> <to>".to_string()),
    }
}

fn seconds(text: &str) -> Result<std::time::Duration, String> {
    let secs: f64 = text
        .parse()
        .map_err(|_| format!("expected seconds, got {text:?}"))?;
    delay_from_secs(secs).map_err(|err| err.to_string())
}

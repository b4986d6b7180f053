use std::fs;
use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use opener_core::{update, AppState, Msg, RunConfig, RunPhase};
use opener_engine::{ContextOpener, DryRunOpener, SystemBrowserOpener};
use opener_logging::opener_info;

use crate::cli::Cli;
use crate::commands::{parse_command, Command};
use crate::effects::EffectRunner;
use crate::render;
use crate::settings::load_settings;

const POLL_INTERVAL: Duration = Duration::from_millis(75);

/// Input from the keyboard thread.
enum Control {
    Command(Command),
    Eof,
}

pub fn run_app(cli: Cli) -> Result<()> {
    if cli.interactive && cli.reads_stdin() {
        bail!("--interactive needs an input file; stdin is used for commands");
    }

    let settings = load_settings(cli.settings.as_deref());
    let config = RunConfig::default()
        .with(&settings.config)
        .with(&cli.config_patch().context("invalid command-line delay")?);
    let raw = read_input(&cli)?;

    let browser = cli.browser.clone().or(settings.browser);
    let opener: Arc<dyn ContextOpener> = if cli.dry_run {
        Arc::new(DryRunOpener)
    } else {
        Arc::new(SystemBrowserOpener::new(browser))
    };
    let export_dir = cli
        .export_dir
        .clone()
        .or(settings.export_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let runner = EffectRunner::new(opener, export_dir)?;

    let mut initial = vec![Msg::InputChanged(raw)];
    if cli.range_start.is_some() || cli.range_end.is_some() {
        initial.push(Msg::RangeChanged {
            start: cli.range_start.unwrap_or(1),
            end: cli.range_end.unwrap_or(usize::MAX),
        });
    }
    if let Some(pattern) = &cli.filter {
        initial.push(Msg::FilterChanged(pattern.clone()));
    }
    if let Some(params) = &cli.append {
        initial.push(Msg::AppendParamsChanged(params.clone()));
    }
    if !cli.interactive {
        initial.push(Msg::StartClicked);
    }

    let mut controller = Controller {
        state: AppState::with_config(config),
        runner,
    };
    for msg in initial {
        controller.dispatch(msg);
    }
    controller.render();

    if cli.interactive {
        println!("{}", render::HELP);
        controller.interactive_loop()
    } else {
        controller.run_to_end();
        Ok(())
    }
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read URL list {}", path.display())),
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read URL list from stdin")?;
            Ok(raw)
        }
    }
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.apply(effects);
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.poll_events() {
            self.dispatch(msg);
        }
    }

    fn render(&mut self) {
        if self.state.consume_dirty() {
            println!("{}", render::status_line(&self.state.view()));
        }
    }

    /// Wait for the single batch started on the command line.
    fn run_to_end(&mut self) {
        while self.state.live_run().is_some() {
            thread::sleep(POLL_INTERVAL);
            self.pump_engine();
            self.render();
        }
        let view = self.state.view();
        if view.phase == RunPhase::Completed && view.progress.remaining() > 0 {
            println!(
                "{} URLs remain; use --interactive to continue with the next batch.",
                view.progress.remaining()
            );
        }
    }

    fn interactive_loop(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_commands(tx));

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Control::Command(Command::Dispatch(msg))) => self.dispatch(msg),
                Ok(Control::Command(Command::List)) => self.print_list(),
                Ok(Control::Command(Command::Status)) => {
                    println!("{}", render::status_line(&self.state.view()));
                }
                Ok(Control::Command(Command::Help)) => println!("{}", render::HELP),
                Ok(Control::Command(Command::Quit)) | Ok(Control::Eof) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            self.pump_engine();
            self.render();
        }

        if let Some(run_id) = self.state.live_run() {
            opener_info!("Quitting with run {} still live", run_id);
            self.dispatch(Msg::PauseClicked);
        }
        Ok(())
    }

    fn print_list(&self) {
        let view = self.state.view();
        for (index, url) in view.effective_urls.iter().enumerate() {
            let position = index + 1;
            let mark = if view.opened_positions.binary_search(&position).is_ok() {
                '*'
            } else {
                ' '
            };
            println!("{mark} {position:>4}  {url}");
        }
    }
}

fn read_commands(tx: mpsc::Sender<Control>) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match parse_command(&line) {
            Ok(command) => {
                if tx.send(Control::Command(command)).is_err() {
                    return;
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }
    let _ = tx.send(Control::Eof);
}

use std::process::{Child, Command, Stdio};
use std::thread;

use opener_logging::{opener_debug, opener_info, opener_warn};
use url::Url;

use crate::{OpenError, OpenMode};

/// Creates a new browsing context for a URL.
///
/// Calls are synchronous: the runner issues a whole stride back to back and
/// only suspends between strides. An `Err` means the context was not created
/// (the equivalent of a popup blocker returning no handle); it is counted, not
/// retried.
pub trait ContextOpener: Send + Sync {
    fn open(&self, url: &str, mode: OpenMode) -> Result<(), OpenError>;
}

/// Opens URLs in the user's browser.
///
/// With no explicit browser program the platform default is used through
/// `webbrowser`, which cannot distinguish tabs from windows. With a program
/// (`firefox`, `chromium`, ...) it is launched with `--new-tab` or
/// `--new-window`.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowserOpener {
    browser: Option<String>,
}

impl SystemBrowserOpener {
    pub fn new(browser: Option<String>) -> Self {
        Self { browser }
    }
}

impl ContextOpener for SystemBrowserOpener {
    fn open(&self, url: &str, mode: OpenMode) -> Result<(), OpenError> {
        let parsed = parse_url(url)?;
        match self.browser.as_deref() {
            Some(program) => {
                let flag = match mode {
                    OpenMode::Tab => "--new-tab",
                    OpenMode::Window => "--new-window",
                };
                Command::new(program)
                    .arg(flag)
                    .arg(parsed.as_str())
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .map(reap)
                    .map_err(|err| OpenError::Launch {
                        url: url.to_string(),
                        message: format!("{program}: {err}"),
                    })
            }
            None => {
                if mode == OpenMode::Window {
                    opener_debug!("Default browser decides tab or window for {}", url);
                }
                webbrowser::open(parsed.as_str()).map_err(|err| OpenError::Launch {
                    url: url.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }
}

/// Validates and logs instead of opening anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunOpener;

impl ContextOpener for DryRunOpener {
    fn open(&self, url: &str, mode: OpenMode) -> Result<(), OpenError> {
        parse_url(url)?;
        opener_info!("[dry run] would open {} in a new {}", url, mode);
        Ok(())
    }
}

/// Wait for a launched browser process off the runner thread so it does not
/// linger as a zombie.
fn reap(mut child: Child) {
    let pid = child.id();
    thread::spawn(move || match child.wait() {
        Ok(status) => opener_debug!("Browser process {} exited: {}", pid, status),
        Err(err) => opener_warn!("Browser process {} could not be reaped: {}", pid, err),
    });
}

fn parse_url(url: &str) -> Result<Url, OpenError> {
    Url::parse(url).map_err(|err| OpenError::InvalidUrl {
        url: url.to_string(),
        message: err.to_string(),
    })
}

// ─── Console Display ───
// Terminal stand-in for the installer window: title line, changelog,
// progress bar, notifications and the control prompt.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

use crate::commands;
use crate::core::error::InstallerResult;
use crate::core::events::{self, EventSender, InstallerEvent, Progress};
use crate::core::install;
use crate::core::state::AppState;
use crate::core::version::ControlAction;

const BAR_WIDTH: usize = 30;

pub struct Console<W: Write> {
    out: W,
    action: ControlAction,
    working: bool,
    /// A progress line is on screen without a trailing newline.
    mid_line: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            action: ControlAction::Install,
            working: false,
            mid_line: false,
        }
    }

    #[cfg(test)]
    pub fn action(&self) -> ControlAction {
        self.action
    }

    pub fn set_action(&mut self, action: ControlAction) {
        self.action = action;
    }

    pub fn set_working(&mut self, working: bool) {
        self.working = working;
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    pub fn render(&mut self, event: InstallerEvent) {
        match event {
            InstallerEvent::Progress(progress) => self.progress_line(&progress),
            InstallerEvent::Info { message } => self.line(&message),
            InstallerEvent::Notification { title, message } => {
                self.line(&format!("== {title} =="));
                self.line(&message);
            }
            InstallerEvent::Error {
                context, message, ..
            } => {
                self.line(&format!("!! {context}: {message}"));
            }
            InstallerEvent::Title { text } => self.line(&format!("# {text}")),
            InstallerEvent::Action { action } => self.action = action,
            InstallerEvent::Idle => self.working = false,
        }
    }

    pub fn render_pending(&mut self, rx: &mut UnboundedReceiver<InstallerEvent>) {
        while let Ok(event) = rx.try_recv() {
            self.render(event);
        }
    }

    pub fn show_changelog(&mut self, html: &str) {
        self.line("---- Changelog ----");
        self.line(html.trim_end());
        self.line("-------------------");
    }

    pub fn prompt(&mut self) {
        self.end_line();
        let _ = write!(
            self.out,
            "[{}] press Enter to start, or q to quit: ",
            self.action
        );
        let _ = self.out.flush();
    }

    pub fn ask_exit(&mut self, app_name: &str) {
        self.end_line();
        let _ = write!(self.out, "Do you want to exit {app_name} Installer? [y/N]: ");
        let _ = self.out.flush();
    }

    pub fn refuse_close(&mut self) {
        self.line("You cannot close the installer right now!");
    }

    fn progress_line(&mut self, progress: &Progress) {
        let filled = usize::from(progress.percent.min(100)) * BAR_WIDTH / 100;
        let _ = write!(
            self.out,
            "\r[{}{}] {:>3}% {:<60}",
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            progress.percent,
            truncate(&progress.message, 60),
        );
        let _ = self.out.flush();
        self.mid_line = true;
    }

    fn line(&mut self, text: &str) {
        self.end_line();
        let _ = writeln!(self.out, "{text}");
    }

    fn end_line(&mut self) {
        if self.mid_line {
            let _ = writeln!(self.out);
            self.mid_line = false;
        }
    }
}

fn truncate(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let mut short: String = message.chars().take(max.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

/// What the user asked for at the prompt.
enum Request {
    Start,
    Quit,
    /// Input is gone; nothing more can be asked.
    Closed,
}

/// Interactive session: load, then run the control action until the user quits.
pub async fn run_session(state: Arc<AppState>) -> InstallerResult<()> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new(state, Console::new(std::io::stdout()), lines, ctrl_c_requests());
    session.run().await
}

/// Every Ctrl-C becomes a close request. Registering the handler also stops
/// the default signal action, so the session decides whether to exit.
fn ctrl_c_requests() -> UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

pub struct Session<W: Write, R> {
    state: Arc<AppState>,
    console: Console<W>,
    events: EventSender,
    rx: UnboundedReceiver<InstallerEvent>,
    lines: Lines<R>,
    input_open: bool,
    close_requests: UnboundedReceiver<()>,
}

impl<W: Write, R: AsyncBufRead + Unpin> Session<W, R> {
    pub fn new(
        state: Arc<AppState>,
        console: Console<W>,
        lines: Lines<R>,
        close_requests: UnboundedReceiver<()>,
    ) -> Self {
        let (events, rx) = events::channel();
        Self {
            state,
            console,
            events,
            rx,
            lines,
            input_open: true,
            close_requests,
        }
    }

    pub async fn run(&mut self) -> InstallerResult<()> {
        match commands::get_changelog(&self.state).await {
            Ok(html) => self.console.show_changelog(&html),
            Err(error) => install::report(&self.events, &error),
        }

        let action = commands::load_installer(&self.state, &self.events).await;
        self.console.render_pending(&mut self.rx);
        self.console.set_action(action);

        while self.input_open {
            self.console.prompt();
            match self.next_request().await? {
                Request::Start => self.install().await,
                Request::Quit => {
                    if self.confirm_exit().await? {
                        break;
                    }
                }
                Request::Closed => break,
            }
        }

        Ok(())
    }

    async fn next_request(&mut self) -> InstallerResult<Request> {
        tokio::select! {
            // Typed answers win over a pending close request.
            biased;
            line = self.lines.next_line() => Ok(match line? {
                None => {
                    self.input_open = false;
                    Request::Closed
                }
                Some(answer) if answer.trim().eq_ignore_ascii_case("q") => Request::Quit,
                Some(_) => Request::Start,
            }),
            Some(()) = self.close_requests.recv() => Ok(Request::Quit),
        }
    }

    async fn confirm_exit(&mut self) -> InstallerResult<bool> {
        self.console.ask_exit(&self.state.settings.app_name);
        tokio::select! {
            line = self.lines.next_line() => Ok(match line? {
                None => true,
                Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            }),
            Some(()) = self.close_requests.recv() => Ok(true),
        }
    }

    /// Run the control action to completion. Input typed meanwhile is
    /// discarded and close requests are refused.
    async fn install(&mut self) {
        self.console.set_working(true);
        let mut worker = commands::start_install(self.state.clone(), self.events.clone());
        loop {
            tokio::select! {
                Some(event) = self.rx.recv() => self.console.render(event),
                joined = &mut worker => {
                    if let Err(e) = joined {
                        warn!("Install task ended abnormally: {}", e);
                    }
                    self.console.render_pending(&mut self.rx);
                    if self.console.is_working() {
                        warn!("Install task ended without going idle");
                        self.console.set_working(false);
                    }
                    break;
                }
                line = self.lines.next_line(), if self.input_open => match line {
                    Ok(Some(_)) => debug!("Ignoring input while working"),
                    Ok(None) | Err(_) => {
                        self.input_open = false;
                        self.console.refuse_close();
                    }
                },
                Some(()) = self.close_requests.recv() => self.console.refuse_close(),
            }
        }
    }
}

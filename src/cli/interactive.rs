//! Interactive front end.
//!
//! The prompt loop owns the file selection and the log output. A batch runs
//! on one worker thread and reports back through the same channel that
//! carries the user's input lines, so the loop stays responsive while files
//! convert.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use crate::audio::file_set::{FileSet, InputFile};
use crate::audio::format::AudioFormat;
use crate::batch::{BatchConverter, BatchEvent, ConversionOptions, RunSummary};
use crate::utils::reporting::{generate_conversion_report, Reporter};
use crate::Result;

const HELP: &str = "\
Commands:
  files <path>...   add audio files (quote paths containing spaces)
  folder <dir>      add every audio file under a folder
  clear             empty the selection
  format <fmt>      target format: mp3, wav, flac, ogg, m4a
  output [<dir>]    output folder; without a folder, use outputs/ beside each file
  report [<csv>]    write a CSV summary after each run; without a path, stop
  status            show the current selection and options
  start             convert the selection in the background
  help              show this help
  quit              exit (waits for a running conversion)";

#[derive(Debug)]
pub enum SessionMessage {
    Input(String),
    InputClosed,
    Batch(BatchEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    files: FileSet,
    options: ConversionOptions,
    report: Option<PathBuf>,
    converter: BatchConverter,
    reporter: Reporter<W>,
    tx: Sender<SessionMessage>,
    worker: Option<JoinHandle<()>>,
    quitting: bool,
}

impl<W: Write> Session<W> {
    pub fn new(
        converter: BatchConverter,
        options: ConversionOptions,
        reporter: Reporter<W>,
        tx: Sender<SessionMessage>,
    ) -> Self {
        Self {
            files: FileSet::new(),
            options,
            report: None,
            converter,
            reporter,
            tx,
            worker: None,
            quitting: false,
        }
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn reporter(&self) -> &Reporter<W> {
        &self.reporter
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn handle(&mut self, message: SessionMessage) -> io::Result<Flow> {
        match message {
            SessionMessage::Input(line) => self.command(&line),
            SessionMessage::InputClosed => self.quit(),
            SessionMessage::Batch(event) => self.on_batch_event(event),
        }
    }

    fn command(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "" => {}
            "files" => {
                let paths = split_args(rest);
                if paths.is_empty() {
                    self.reporter.line("Usage: files <path>...")?;
                } else {
                    self.files.add_files(paths);
                    self.update_count()?;
                }
            }
            "folder" => self.add_folder(&unquote(rest))?,
            "clear" => {
                self.files.clear();
                self.update_count()?;
                self.reporter.line("Selection cleared.")?;
            }
            "format" => match rest.parse::<AudioFormat>() {
                Ok(format) => {
                    self.options.format = format;
                    self.reporter.line(format!("Target format: {}", format))?;
                }
                Err(_) => self.reporter.line(format!(
                    "Unknown format '{}'. Choose one of: {}",
                    rest,
                    format_choices()
                ))?,
            },
            "output" => {
                self.options.destination_dir = Some(unquote(rest))
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from);
                self.show_output_dir()?;
            }
            "report" => {
                self.report = Some(unquote(rest))
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from);
                match &self.report {
                    Some(path) => self.reporter.line(format!("Report file: {}", path.display()))?,
                    None => self.reporter.line("Report disabled.")?,
                }
            }
            "status" => self.status()?,
            "start" => self.start()?,
            "help" => self.reporter.line(HELP)?,
            "quit" | "exit" => return self.quit(),
            other => self
                .reporter
                .line(format!("Unknown command '{}'. Type 'help' for commands.", other))?,
        }
        Ok(Flow::Continue)
    }

    fn add_folder(&mut self, folder: &str) -> io::Result<()> {
        if folder.is_empty() {
            return self.reporter.line("Usage: folder <dir>");
        }
        match self.files.add_folder(folder) {
            Ok(count) => {
                self.update_count()?;
                self.reporter.line(format!("Added {} files from folder: {}", count, folder))
            }
            Err(e) => self.reporter.line(format!("ERROR: {}", e)),
        }
    }

    fn update_count(&mut self) -> io::Result<()> {
        match self.files.len() {
            0 => self.reporter.line("No files selected"),
            n => self.reporter.line(format!("{} files selected", n)),
        }
    }

    fn show_output_dir(&mut self) -> io::Result<()> {
        match &self.options.destination_dir {
            Some(dir) => self.reporter.line(format!("Output folder: {}", dir.display())),
            None => self.reporter.line("Output folder: outputs/ beside each source file"),
        }
    }

    fn status(&mut self) -> io::Result<()> {
        self.update_count()?;
        let listing: Vec<String> = self
            .files
            .iter()
            .map(|f| format!("  {}", f.path.display()))
            .collect();
        for line in listing {
            self.reporter.line(line)?;
        }
        self.reporter.line(format!("Target format: {}", self.options.format))?;
        self.show_output_dir()?;
        if self.is_running() {
            self.reporter.line("A conversion is running.")?;
        }
        Ok(())
    }

    fn start(&mut self) -> io::Result<()> {
        if self.is_running() {
            return self.reporter.line("A conversion is already running.");
        }
        if self.files.is_empty() {
            return self.dialog("No Files", &["Please select files to convert first."]);
        }

        let files = self.files.to_vec();
        let options = self.options.clone();
        let converter = self.converter.clone();
        let tx = self.tx.clone();

        log::info!("Spawning conversion worker for {} files", files.len());
        self.worker = Some(thread::spawn(move || {
            converter.run(&files, &options, |event| {
                // The prompt loop may already be gone; nothing left to tell.
                let _ = tx.send(SessionMessage::Batch(event));
            });
        }));
        Ok(())
    }

    fn on_batch_event(&mut self, event: BatchEvent) -> io::Result<Flow> {
        self.reporter.event(&event)?;

        let BatchEvent::Completed(summary) = event else {
            return Ok(Flow::Continue);
        };

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Conversion worker panicked");
            }
        }
        self.finish_run(&summary)?;

        if self.quitting {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    /// Shows the completion dialog and drops the converted files from the
    /// selection. Files that failed stay selected so they can be retried.
    fn finish_run(&mut self, summary: &RunSummary) -> io::Result<()> {
        if let Some(path) = self.report.clone() {
            match generate_conversion_report(summary, &path) {
                Ok(()) => self.reporter.line(format!("Report saved to: {}", path.display()))?,
                Err(e) => self.reporter.line(format!("ERROR: could not write report: {}", e))?,
            }
        }

        self.dialog(
            "Done",
            &[
                "Conversion Finished!",
                &format!("Success: {}", summary.succeeded),
                &format!("Failed: {}", summary.failed),
            ],
        )?;

        let converted: Vec<&InputFile> = summary
            .outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.input())
            .collect();
        let removed = converted.into_iter().filter(|f| self.files.remove(f)).count();
        if removed > 0 {
            self.reporter
                .line(format!("Removed {} converted files from the selection.", removed))?;
            self.update_count()?;
        }
        Ok(())
    }

    fn quit(&mut self) -> io::Result<Flow> {
        if self.is_running() {
            if !self.quitting {
                self.quitting = true;
                self.reporter
                    .line("Waiting for the running conversion to finish...")?;
            }
            return Ok(Flow::Continue);
        }
        Ok(Flow::Quit)
    }

    fn dialog(&mut self, title: &str, lines: &[&str]) -> io::Result<()> {
        let width = lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0);
        let border = format!("+{}+", "-".repeat(width + 2));

        self.reporter.line(&border)?;
        self.reporter.line(format!("| {:<width$} |", title, width = width))?;
        self.reporter.line(&border)?;
        for line in lines {
            self.reporter.line(format!("| {:<width$} |", line, width = width))?;
        }
        self.reporter.line(&border)
    }
}

fn format_choices() -> String {
    AudioFormat::ALL
        .iter()
        .map(|f| f.extension())
        .collect::<Vec<_>>()
        .join(", ")
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in s.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

fn spawn_input_reader(tx: Sender<SessionMessage>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(SessionMessage::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(SessionMessage::InputClosed);
    });
}

/// Runs the prompt loop on stdin until `quit` or end of input.
pub fn run_interactive<W: Write>(
    converter: BatchConverter,
    options: ConversionOptions,
    out: W,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());

    let mut session = Session::new(converter, options, Reporter::new(out), tx);
    session.reporter.line("BeatBerry audio converter. Type 'help' for commands.")?;
    session.update_count()?;

    for message in rx {
        if session.handle(message)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEngine;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::mpsc::Receiver;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn session(engine: ScriptedEngine) -> (Session<Vec<u8>>, Receiver<SessionMessage>) {
        let (tx, rx) = mpsc::channel();
        let converter = BatchConverter::new(Arc::new(engine));
        let session = Session::new(converter, ConversionOptions::default(), Reporter::new(Vec::new()), tx);
        (session, rx)
    }

    fn send(session: &mut Session<Vec<u8>>, line: &str) -> Flow {
        session.handle(SessionMessage::Input(line.to_string())).unwrap()
    }

    fn drain(session: &mut Session<Vec<u8>>, rx: &Receiver<SessionMessage>) -> Flow {
        let mut flow = Flow::Continue;
        while session.is_running() {
            flow = session.handle(rx.recv().unwrap()).unwrap();
        }
        flow
    }

    fn text(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(session.reporter().get_ref()).into_owned()
    }

    #[test]
    fn split_args_honours_quotes() {
        assert_eq!(
            split_args(r#"/a/one.mp3  "/b/two words.wav" /c"#),
            vec!["/a/one.mp3", "/b/two words.wav", "/c"]
        );
        assert_eq!(split_args(r#""""#), vec![""]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn start_without_files_shows_warning() {
        let (mut session, _rx) = session(ScriptedEngine::new());
        send(&mut session, "start");
        assert!(!session.is_running());
        assert!(text(&session).contains("Please select files to convert first."));
    }

    #[test]
    fn selection_commands_update_count() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.ogg"), b"").unwrap();
        fs::write(tmp.path().join("b.txt"), b"").unwrap();
        let (mut session, _rx) = session(ScriptedEngine::new());

        send(&mut session, "files /x/one.mp3 /x/one.mp3");
        send(&mut session, &format!("folder {}", tmp.path().display()));
        assert_eq!(session.files().len(), 2);

        send(&mut session, "clear");
        assert!(session.files().is_empty());

        let out = text(&session);
        assert!(out.contains("1 files selected"));
        assert!(out.contains("Added 1 files from folder"));
        assert!(out.contains("2 files selected"));
        assert!(out.contains("Selection cleared."));
    }

    #[test]
    fn options_commands() {
        let (mut session, _rx) = session(ScriptedEngine::new());
        send(&mut session, "format FLAC");
        send(&mut session, "format aiff");
        send(&mut session, "output /music/converted");
        assert_eq!(session.options().format, AudioFormat::Flac);
        assert_eq!(session.options().destination_dir, Some(PathBuf::from("/music/converted")));

        send(&mut session, "output");
        assert_eq!(session.options().destination_dir, None);
        assert!(text(&session).contains("Unknown format 'aiff'"));
    }

    #[test]
    fn batch_runs_in_background_and_keeps_failures_selected() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("b.wav");
        let (mut session, rx) = session(ScriptedEngine::new().fail_on(&bad));
        send(
            &mut session,
            &format!("files {} {} {}", tmp.path().join("a.wav").display(), bad.display(), tmp.path().join("c.wav").display()),
        );

        send(&mut session, "start");
        assert!(session.is_running());
        send(&mut session, "start");
        drain(&mut session, &rx);

        let out = text(&session);
        assert!(out.contains("A conversion is already running."));
        assert!(out.contains("[3/3] Processing: c.wav"));
        assert!(out.contains("Success: 2"));
        assert!(out.contains("Failed: 1"));
        assert!(out.contains("Conversion Finished!"));
        assert!(tmp.path().join("outputs/a.mp3").exists());
        assert!(tmp.path().join("outputs/c.mp3").exists());

        let remaining: Vec<_> = session.files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(remaining, vec![bad]);
    }

    #[test]
    fn missing_engine_fails_every_file() {
        let tmp = TempDir::new().unwrap();
        let (mut session, rx) = session(ScriptedEngine::missing());
        send(
            &mut session,
            &format!("files {} {}", tmp.path().join("a.m4a").display(), tmp.path().join("b.m4a").display()),
        );

        send(&mut session, "start");
        drain(&mut session, &rx);

        let out = text(&session);
        assert!(out.contains("Success: 0"));
        assert!(out.contains("Failed: 2"));
        assert!(out.contains("could not be started for any file"));
        assert_eq!(session.files().len(), 2);
    }

    #[test]
    fn quit_waits_for_running_batch() {
        let tmp = TempDir::new().unwrap();
        let (mut session, rx) = session(ScriptedEngine::new());
        send(&mut session, &format!("files {}", tmp.path().join("a.flac").display()));
        send(&mut session, "start");

        assert_eq!(send(&mut session, "quit"), Flow::Continue);
        assert_eq!(session.handle(SessionMessage::InputClosed).unwrap(), Flow::Continue);
        assert_eq!(drain(&mut session, &rx), Flow::Quit);
        assert_eq!(text(&session).matches("Waiting for the running conversion").count(), 1);
    }

    #[test]
    fn quit_when_idle() {
        let (mut session, _rx) = session(ScriptedEngine::new());
        assert_eq!(session.handle(SessionMessage::InputClosed).unwrap(), Flow::Quit);
    }
}

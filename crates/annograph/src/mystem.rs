//! Client for the Yandex `mystem` morphological analyzer.
//!
//! One `mystem` process is started per [`MystemLemmatizer`] and kept alive for
//! its whole lifetime. Requests are single lines on stdin; with
//! `--format json -c` the analyzer answers each line with one JSON array on
//! stdout. A response is read line by line until the buffered text forms a
//! complete array, so a reply split across lines stays in step.

use std::{
    ffi::OsStr,
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use log::{debug, info};
use serde::Deserialize;

use annograph_core::lemma::{LemmatizeError, Lemmatizer};

/// Arguments: JSON output, disambiguation, copy whole input, grammemes.
const MYSTEM_ARGS: [&str; 5] = ["--format", "json", "-d", "-c", "-i"];

#[derive(Debug, Deserialize)]
struct AnalyzedItem {
    text: String,
    #[serde(default)]
    analysis: Vec<Analysis>,
}

#[derive(Debug, Deserialize)]
struct Analysis {
    lex: String,
}

/// A [`Lemmatizer`] backed by a long-lived `mystem` child process.
pub struct MystemLemmatizer {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl MystemLemmatizer {
    /// Starts `program` (usually just `"mystem"`) with JSON output enabled.
    ///
    /// # Errors
    ///
    /// Returns [`LemmatizeError::Io`] if the process cannot be spawned.
    pub fn spawn(program: impl AsRef<OsStr>) -> Result<Self, LemmatizeError> {
        let program = program.as_ref();
        let mut child = Command::new(program)
            .args(MYSTEM_ARGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(LemmatizeError::Terminated);
        };

        info!(program:? = program, pid = child.id(); "Started mystem");

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }
}

impl Lemmatizer for MystemLemmatizer {
    fn lemmatize(&mut self, text: &str) -> Result<Vec<String>, LemmatizeError> {
        // Blank input may produce no response line at all.
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let line = text.replace(['\r', '\n'], " ");
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;

        let lemmas = read_response(&mut self.stdout)?;
        debug!(text, lemmas:? = lemmas; "Lemmatized");
        Ok(lemmas)
    }
}

impl Drop for MystemLemmatizer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Reads lines from `reader` until they parse as one complete response.
fn read_response(reader: &mut impl BufRead) -> Result<Vec<String>, LemmatizeError> {
    let mut response = String::new();
    loop {
        if reader.read_line(&mut response)? == 0 {
            return Err(LemmatizeError::Terminated);
        }
        if let Some(lemmas) = parse_response(&response)? {
            return Ok(lemmas);
        }
    }
}

/// Extracts one lemma per analyzed item: the first analysis' `lex`, or the
/// item's own text for punctuation, whitespace and unknown words.
///
/// Returns `Ok(None)` while `buffer` is a truncated response.
fn parse_response(buffer: &str) -> Result<Option<Vec<String>>, LemmatizeError> {
    let items: Vec<AnalyzedItem> = match serde_json::from_str(buffer.trim()) {
        Ok(items) => items,
        Err(err) if err.is_eof() => return Ok(None),
        Err(err) => return Err(LemmatizeError::Malformed(err.to_string())),
    };

    let lemmas = items
        .into_iter()
        .map(|item| match item.analysis.into_iter().next() {
            Some(analysis) => analysis.lex,
            None => item.text,
        })
        .collect();
    Ok(Some(lemmas))
}

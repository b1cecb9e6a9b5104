//! Parser for esbuild's plain-text log output.
//!
//! esbuild run with `--color=false` prints each message as
//!
//! ```text
//! ✘ [ERROR] Could not resolve "foo"
//!
//!     src/index.ts:1:16:
//!       1 │ import foo from "foo";
//!         ╵                 ~~~~~
//!
//!   You can mark the path "foo" as external to exclude it from the bundle.
//!
//! 1 error
//! ```
//!
//! and this module turns that back into [`Message`]s.

use super::{Location, Message, Note};
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:✘|X|▲|!) \[(ERROR|WARNING)\] (.*)$").expect("header pattern is valid")
});

static PLUGIN_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[plugin ([^\]]+)\] (.*)$").expect("plugin pattern is valid"));

static MESSAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \[([a-z][a-z0-9-]*)\]$").expect("id pattern is valid"));

static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4}(\S.*):(\d+):(\d+):$").expect("location pattern is valid"));

static SOURCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+\d+ │ ?(.*)$").expect("source pattern is valid"));

static MARKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+[│╵] ?(.*)$").expect("marker pattern is valid"));

static NOTE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {2}(\S.*)$").expect("note pattern is valid"));

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+ (?:of \d+ )?(?:errors?|warnings?)\b").expect("summary pattern is valid")
});

/// Messages recovered from one esbuild log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedLog {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
}

impl ParsedLog {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Error,
    Warning,
}

/// Where the next location block belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Message,
    Note { paragraph_open: bool },
}

#[derive(Debug)]
struct Pending {
    kind: Kind,
    message: Message,
    section: Section,
    /// Location block currently being read, with the line text already seen.
    location: Option<(Location, bool)>,
}

impl Pending {
    fn new(kind: Kind, header: &str) -> Self {
        let mut message = Message::default();
        let mut text = header.to_string();

        if let Some(caps) = PLUGIN_PREFIX.captures(&text) {
            message.plugin_name = caps[1].to_string();
            text = caps[2].to_string();
        }
        if let Some(caps) = MESSAGE_ID.captures(&text) {
            message.id = caps[2].to_string();
            text = caps[1].to_string();
        }
        message.text = text;

        Self {
            kind,
            message,
            section: Section::Message,
            location: None,
        }
    }

    fn flush_location(&mut self) {
        let Some((location, _)) = self.location.take() else {
            return;
        };

        match self.section {
            Section::Message => self.message.location = Some(location),
            Section::Note { .. } => match self.message.notes.last_mut() {
                Some(note) if note.location.is_none() => note.location = Some(location),
                _ => self.message.notes.push(Note {
                    text: String::new(),
                    location: Some(location),
                }),
            },
        }
    }

    fn push_line(&mut self, line: &str) {
        if let Some(caps) = LOCATION.captures(line) {
            self.flush_location();
            let location = Location {
                file: caps[1].to_string(),
                line: caps[2].parse().unwrap_or(0),
                column: caps[3].parse().unwrap_or(0),
                ..Location::default()
            };
            self.location = Some((location, false));
            return;
        }

        if let Some((location, seen_source)) = self.location.as_mut() {
            if !*seen_source {
                if let Some(caps) = SOURCE_LINE.captures(line) {
                    location.line_text = caps[1].to_string();
                    *seen_source = true;
                    return;
                }
            } else if let Some(caps) = MARKER_LINE.captures(line) {
                let content = caps[1].trim();
                let is_marker = content.chars().all(|c| matches!(c, '~' | '^' | ' '));
                if !is_marker {
                    location.suggestion = content.to_string();
                }
                return;
            }
        }

        if line.trim().is_empty() {
            self.flush_location();
            if let Section::Note { paragraph_open } = &mut self.section {
                *paragraph_open = false;
            }
            return;
        }

        if let Some(caps) = NOTE_LINE.captures(line) {
            self.flush_location();
            let text = &caps[1];
            match self.section {
                Section::Note {
                    paragraph_open: true,
                } => {
                    if let Some(note) = self.message.notes.last_mut() {
                        note.text.push(' ');
                        note.text.push_str(text);
                    }
                }
                _ => self.message.notes.push(Note {
                    text: text.to_string(),
                    location: None,
                }),
            }
            self.section = Section::Note {
                paragraph_open: true,
            };
        }
    }

    fn finish(mut self, log: &mut ParsedLog) {
        self.flush_location();
        match self.kind {
            Kind::Error => log.errors.push(self.message),
            Kind::Warning => log.warnings.push(self.message),
        }
    }
}

/// Parses esbuild's stderr into errors and warnings.
///
/// Lines outside of a message (summaries, banners) are ignored.
pub fn parse(output: &str) -> ParsedLog {
    let mut log = ParsedLog::default();
    let mut pending: Option<Pending> = None;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(caps) = HEADER.captures(line) {
            if let Some(done) = pending.take() {
                done.finish(&mut log);
            }
            let kind = if &caps[1] == "ERROR" {
                Kind::Error
            } else {
                Kind::Warning
            };
            pending = Some(Pending::new(kind, &caps[2]));
            continue;
        }

        if SUMMARY.is_match(line) {
            if let Some(done) = pending.take() {
                done.finish(&mut log);
            }
            continue;
        }

        if let Some(current) = pending.as_mut() {
            current.push_line(line);
        }
    }

    if let Some(done) = pending.take() {
        done.finish(&mut log);
    }

    log
}

//! Process-scoped deduplication of collaborator warnings.
//!
//! Extractors repeat the same warning for every item they touch. This keeps
//! the log readable: known noise is dropped, `[extractor] id: message` lines
//! are keyed by their message body, and each distinct message is logged once.

use regex::Regex;
use std::collections::HashSet;
use std::sync::{LazyLock, Mutex, MutexGuard};

// "[youtube] dQw4w9WgXcQ: Some message" → "Some message"
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[.*?\]\s+.*?:?\s+(.*)$").unwrap());

/// Warnings that carry no actionable information.
const SUPPRESSED: &[&str] = &[
    "No supported JavaScript runtime",
    "web client https formats have been skipped",
];

/// Shown at most once per process, whatever the surrounding text.
const COOKIE_NOTICE: &str = "The provided YouTube account cookies are no longer valid";

#[derive(Debug, Default)]
struct State {
    seen: HashSet<String>,
    cookie_notice_shown: bool,
    runtime_noted: bool,
}

#[derive(Debug, Default)]
pub struct WarningLog {
    state: Mutex<State>,
}

static GLOBAL: LazyLock<WarningLog> = LazyLock::new(WarningLog::default);

/// The process-wide warning log.
pub fn global() -> &'static WarningLog {
    &GLOBAL
}

/// Dedup key for a warning: the message body without the extractor prefix.
pub fn message_key(msg: &str) -> &str {
    PREFIX_RE
        .captures(msg)
        .and_then(|c| c.get(1))
        .map_or(msg, |m| m.as_str())
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // The state is a plain set; a panic elsewhere can't leave it inconsistent
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log a warning unless it is noise or already seen. Returns whether it
    /// was emitted.
    pub fn warning(&self, msg: &str) -> bool {
        self.note(msg);
        if SUPPRESSED.iter().any(|s| msg.contains(s)) {
            return false;
        }

        let mut state = self.state();
        if msg.contains(COOKIE_NOTICE) {
            if state.cookie_notice_shown {
                return false;
            }
            state.cookie_notice_shown = true;
        }
        if !state.seen.insert(message_key(msg).to_string()) {
            return false;
        }
        drop(state);

        log::warn!("{msg}");
        true
    }

    pub fn error(&self, msg: &str) {
        log::error!("{msg}");
    }

    /// Watch informational output for the JavaScript runtime line, reported
    /// once at info level.
    pub fn note(&self, msg: &str) {
        let lower = msg.to_lowercase();
        let detected = lower.contains("using js runtime")
            || (lower.contains("js") && (lower.contains("deno") || lower.contains("node")));
        let fallback = lower.contains("no supported javascript runtime");
        if !detected && !fallback {
            return;
        }

        let mut state = self.state();
        if state.runtime_noted {
            return;
        }
        state.runtime_noted = true;
        drop(state);

        if detected {
            log::info!("JS runtime detected: {msg}");
        } else {
            log::info!("JS runtime: builtin/fallback");
        }
    }

    /// Route one line of collaborator output by its `WARNING:`/`ERROR:`
    /// prefix. Returns whether anything was emitted at warning level or above.
    pub fn line(&self, line: &str) -> bool {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("WARNING:") {
            self.warning(rest.trim())
        } else if let Some(rest) = line.strip_prefix("ERROR:") {
            self.error(rest.trim());
            true
        } else {
            self.note(line);
            false
        }
    }

    /// Number of distinct warnings emitted so far.
    pub fn distinct(&self) -> usize {
        self.state().seen.len()
    }
}

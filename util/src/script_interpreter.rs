//! # Input script interpreter module
//!
//! This module replays timed input messages from a script file. Each entry
//! in a script has the form `<time_s>: <json message>;`, for example
//!
//! ```text
//! 0.0: {"type": "ROUTE", "payload": {"path": "routes/straight.csv"}};
//! 0.5: {"type": "POSE", "payload": {"position_m": [0.2, 0.0, 0.0], "attitude_q": [0.0, 0.0, 0.0, 1.0]}};
//! 2.0: {"type": "STOP_LINE", "payload": {"wp_index": 40}};
//! ```
//!
//! A message runs from its first `{` to the last `}` on the line, so payloads may contain `;`.
//! Anything not matching this form (such as `#` comment lines) is ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::msg::{InputMsg, InputMsgParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A message which is scripted to be delivered at a specific time.
struct ScriptedMsg {
    /// The time the message is supposed to be delivered at
    exec_time_s: f64,

    msg: InputMsg
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending`
/// to acquire a list of messages that are due for delivery.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    msgs: VecDeque<ScriptedMsg>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid message at {0} s: {1}")]
    InvalidMsg(f64, InputMsgParseError)
}

/// Messages which are due for delivery.
#[derive(Debug, PartialEq)]
pub enum Pending {
    None,
    Some(Vec<InputMsg>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = script_path.as_ref().to_path_buf();
        
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        Self::parse_script(path, &script)
    }

    /// Build an interpreter from the contents of a script.
    fn parse_script(path: PathBuf, script: &str) -> Result<Self, ScriptError> {

        let mut queue: VecDeque<ScriptedMsg> = VecDeque::new();

        // Go through the script executing __the magic regex__. The regex is a
        // fixed literal so building it cannot fail.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*(\{.*\})\s*;")
            .multi_line(true)
            .build()
            .unwrap();

        for cap in re.captures_iter(script) {
            // Groups 1 and 3 always participate in a match
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let msg = InputMsg::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidMsg(exec_time_s, e))?;

            queue.push_back(ScriptedMsg {
                exec_time_s,
                msg
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Delivery order follows time, entries at equal times keep script order
        queue.make_contiguous()
            .sort_by(|a, b| a.exec_time_s.total_cmp(&b.exec_time_s));

        Ok(ScriptInterpreter {
            _script_path: path,
            msgs: queue
        })
    }

    /// Return the messages due for delivery now, measured from the session
    /// epoch.
    pub fn get_pending(&mut self) -> Pending {
        self.get_pending_at(get_elapsed_seconds())
    }

    /// Return the messages due for delivery at `current_time_s`.
    pub fn get_pending_at(&mut self, current_time_s: f64) -> Pending {

        // If the queue is empty the script is over
        if self.msgs.is_empty() {
            return Pending::EndOfScript
        }

        let mut due: Vec<InputMsg> = vec![];

        while let Some(front) = self.msgs.front() {
            if front.exec_time_s > current_time_s {
                break;
            }

            if let Some(m) = self.msgs.pop_front() {
                due.push(m.msg);
            }
        }

        if due.is_empty() {
            Pending::None
        }
        else {
            Pending::Some(due)
        }
    }

    /// Get the number of messages remaining in the script
    pub fn get_num_msgs(&self) -> usize {
        self.msgs.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.msgs.back() {
            Some(m) => m.exec_time_s,
            None => 0f64
        }
    }
}

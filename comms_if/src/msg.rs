//! # Input message module
//!
//! Messages are JSON objects of the form `{"type": "POSE", "payload": {...}}`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A message delivered to the planner by one of its input sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMsg {
    /// Latest vehicle pose.
    Pose {
        /// Position in the map frame
        position_m: [f64; 3],

        /// Attitude quaternion in the map frame, ordered `[i, j, k, w]`
        attitude_q: [f64; 4]
    },

    /// Stop line command.
    StopLine {
        /// Index of the stop line waypoint in the route, or `-1` if there is
        /// no active stop line.
        wp_index: i32
    },

    /// The static route, given as a route file relative to the software root.
    Route {
        path: String
    }
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputMsgParseError {
    #[error("Message contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Pose attitude quaternion has zero norm")]
    ZeroQuaternion
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputMsg {

    /// Parse a new message from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, InputMsgParseError> {
        let msg: Self = serde_json::from_str(json_str)
            .map_err(InputMsgParseError::InvalidJson)?;

        // A zero quaternion cannot be normalised into an attitude
        if let InputMsg::Pose { attitude_q, .. } = &msg {
            if attitude_q.iter().all(|c| *c == 0.0) {
                return Err(InputMsgParseError::ZeroQuaternion)
            }
        }

        Ok(msg)
    }

    /// Serialise the message into a JSON packet
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_pose() {
        let msg = InputMsg::from_json(
            r#"{"type": "POSE", "payload": {"position_m": [1.0, 2.0, 0.0], "attitude_q": [0.0, 0.0, 0.0, 1.0]}}"#
        ).unwrap();

        assert_eq!(msg, InputMsg::Pose {
            position_m: [1.0, 2.0, 0.0],
            attitude_q: [0.0, 0.0, 0.0, 1.0]
        });
    }

    #[test]
    fn test_parse_stop_line() {
        let msg = InputMsg::from_json(
            r#"{"type": "STOP_LINE", "payload": {"wp_index": -1}}"#
        ).unwrap();

        assert_eq!(msg, InputMsg::StopLine { wp_index: -1 });
    }

    #[test]
    fn test_parse_route() {
        let msg = InputMsg::from_json(
            r#"{"type": "ROUTE", "payload": {"path": "routes/straight.csv"}}"#
        ).unwrap();

        assert_eq!(msg, InputMsg::Route { path: "routes/straight.csv".into() });
    }

    #[test]
    fn test_reject_unknown_type() {
        match InputMsg::from_json(r#"{"type": "OBSTACLE", "payload": {"wp_index": 3}}"#) {
            Err(InputMsgParseError::InvalidJson(_)) => (),
            r => panic!("Expected InvalidJson, got {:?}", r)
        }
    }

    #[test]
    fn test_reject_zero_quaternion() {
        match InputMsg::from_json(
            r#"{"type": "POSE", "payload": {"position_m": [0.0, 0.0, 0.0], "attitude_q": [0.0, 0.0, 0.0, 0.0]}}"#
        ) {
            Err(InputMsgParseError::ZeroQuaternion) => (),
            r => panic!("Expected ZeroQuaternion, got {:?}", r)
        }
    }
}

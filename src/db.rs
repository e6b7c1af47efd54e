use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipient meaning "everyone in the room".
pub const BROADCAST: &str = "Todos";

pub const JOIN_TEXT: &str = "entra na sala...";
pub const LEAVE_TEXT: &str = "sai da sala...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// Epoch milliseconds of the last heartbeat (or of registration).
    #[serde(rename = "lastStatus")]
    pub last_status: i64,

    // unique: name
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        use MessageKind::*;
        match self {
            Message => "message",
            PrivateMessage => "private_message",
            Status => "status",
        }
    }

    /// `status` events are only ever produced by the server.
    pub fn is_user_submittable(&self) -> bool {
        !matches!(self, MessageKind::Status)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessageKind(pub String);

impl fmt::Display for UnknownMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown message type {:?}", self.0)
    }
}

impl std::error::Error for UnknownMessageKind {}

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(UnknownMessageKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,

    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Wall-clock "HH:MM:SS" at insertion.
    pub time: String,

    // unique: id
}

impl Message {
    pub fn new(from: String, to: String, text: String, kind: MessageKind, time: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            from,
            to,
            text,
            kind,
            time,
        }
    }

    pub(crate) fn status(from: &str, text: &str, time: String) -> Self {
        Self::new(
            from.to_owned(),
            BROADCAST.to_owned(),
            text.to_owned(),
            MessageKind::Status,
            time,
        )
    }

    /// A message is visible to whoever sent it, whoever it is addressed
    /// to, and everyone when it is a broadcast.
    pub fn is_visible_to(&self, viewer: Option<&str>) -> bool {
        if self.to == BROADCAST {
            return true;
        }
        match viewer {
            Some(viewer) => self.from == viewer || self.to == viewer,
            None => false,
        }
    }
}

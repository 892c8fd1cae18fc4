//! Line-oriented JSON messages exchanged with ship clients

use serde::{Deserialize, Serialize};

use crate::sim::{Command, CommandReply, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientRequest {
    Connect { ship: char },
    Move { ship: char, direction: Direction },
}

impl ClientRequest {
    pub fn kind(&self) -> ResponseKind {
        match self {
            ClientRequest::Connect { .. } => ResponseKind::Connect,
            ClientRequest::Move { .. } => ResponseKind::Move,
        }
    }

    pub fn into_command(self) -> Command {
        match self {
            ClientRequest::Connect { ship } => Command::Connect { ship },
            ClientRequest::Move { ship, direction } => Command::Move { ship, direction },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Connect,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub kind: ResponseKind,
    pub success: bool,
}

impl ServerResponse {
    pub fn new(kind: ResponseKind, reply: CommandReply) -> Self {
        Self {
            kind,
            success: reply.is_ok(),
        }
    }
}

pub fn decode_request(line: &str) -> Result<ClientRequest, serde_json::Error> {
    serde_json::from_str(line.trim())
}

pub fn encode_response(response: &ServerResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string(response)
}

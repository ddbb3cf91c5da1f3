use std::{fmt, io, sync::mpsc::SendError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use serde_json::Error as JsonError;

use crate::event::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum JpdError {
    #[error("Invalid Command: {0}")]
    Command(String),
    #[error("Belief vector has {found} entries but the variable has {expected} states")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("State '{label}' of variable '{variable}' does not have a numeric title")]
    InvalidStateLabel { variable: String, label: String },
    #[error("File System error: {0}")]
    Io(String),
    #[error("Invalid network definition: {0}")]
    Network(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Inference engine error: {0}")]
    Oracle(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for JpdError {
    fn from(src: toml::de::Error) -> JpdError {
        JpdError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for JpdError {
    fn from(src: toml::ser::Error) -> JpdError {
        JpdError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for JpdError {
    fn from(src: JsonError) -> JpdError {
        JpdError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for JpdError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => JpdError::NotFound(format!("{x}")),
            _ => JpdError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for JpdError {
    fn from(x: fmt::Error) -> Self {
        JpdError::Serialization(format!("{x}"))
    }
}

impl From<SendError<Event>> for JpdError {
    fn from(x: SendError<Event>) -> Self {
        JpdError::Io(format!(
            "Channel update send Error, could not transmit event {:?}",
            x.0
        ))
    }
}

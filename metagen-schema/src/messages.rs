//! Request and notification definitions.
//!
//! Messages are decoded so that the whole document is validated, but only
//! their method names and directions are consumed downstream.

use crate::model::Annotations;
use crate::types::{OneOrMore, Type};
use serde::Deserialize;

/// Direction in which a message flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageDirection {
    /// Sent by the client.
    ClientToServer,
    /// Sent by the server.
    ServerToClient,
    /// Sent by either side.
    Both,
}

/// Request definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Method name.
    pub method: String,
    /// Result type.
    pub result: Type,
    /// Parameter type(s).
    #[serde(default)]
    pub params: Option<OneOrMore<Type>>,
    /// Partial result type.
    #[serde(default)]
    pub partial_result: Option<Type>,
    /// Error data type.
    #[serde(default)]
    pub error_data: Option<Type>,
    /// Dynamic registration method.
    #[serde(default)]
    pub registration_method: Option<String>,
    /// Dynamic registration options type.
    #[serde(default)]
    pub registration_options: Option<Type>,
    /// Message direction.
    pub message_direction: MessageDirection,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Notification definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Method name.
    pub method: String,
    /// Parameter type(s).
    #[serde(default)]
    pub params: Option<OneOrMore<Type>>,
    /// Dynamic registration method.
    #[serde(default)]
    pub registration_method: Option<String>,
    /// Dynamic registration options type.
    #[serde(default)]
    pub registration_options: Option<Type>,
    /// Message direction.
    pub message_direction: MessageDirection,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

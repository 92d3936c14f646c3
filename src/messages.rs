//! WebSocket message types for client-server communication

use serde::{Deserialize, Serialize};

use crate::controls::{FilterControls, RenderRequest};
use crate::dashboard::Dashboard;

/// Messages sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request the available filter controls and their defaults
    Controls,

    /// Render the dashboard for a filter selection
    Render(RenderRequest),
}

/// Messages sent from server to client
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Filter controls in response to Controls
    Controls(FilterControls),

    /// A freshly rendered dashboard in response to Render
    Dashboard(Box<Dashboard>),

    /// Error occurred
    Error { message: String },
}

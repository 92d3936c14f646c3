//! WebSocket endpoint: re-render the dashboard on every filter change
use actix::prelude::*;
use actix_web_actors::ws;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::controls::{FilterControls, RenderRequest};
use crate::dashboard::{render, Dashboard};
use crate::dataset::Dataset;
use crate::error::FilterError;
use crate::messages::{ClientMessage, ServerMessage};

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared, read-only state for all connections
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub controls: FilterControls,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let controls = FilterControls::from_dataset(&dataset);
        Self { dataset, controls }
    }

    /// Render the dashboard for a client request
    pub fn render(&self, request: &RenderRequest) -> Result<Dashboard, FilterError> {
        let criteria = request.to_criteria(&self.controls)?;
        Ok(render(&self.dataset, &criteria))
    }

    /// Answer one client message
    pub fn respond(&self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::Controls => ServerMessage::Controls(self.controls.clone()),
            ClientMessage::Render(request) => match self.render(&request) {
                Ok(dashboard) => ServerMessage::Dashboard(Box::new(dashboard)),
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            },
        }
    }
}

/// WebSocket connection actor
pub struct DashboardWebSocket {
    hb: Instant,
    state: actix_web::web::Data<AppState>,
}

impl DashboardWebSocket {
    pub fn new(state: actix_web::web::Data<AppState>) -> Self {
        Self {
            hb: Instant::now(),
            state,
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                warn!("WebSocket client heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Failed to serialize server message: {}", e),
        }
    }
}

impl Actor for DashboardWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hb(ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for DashboardWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.hb = Instant::now();
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        debug!("WebSocket request: {:?}", client_msg);
                        self.state.respond(client_msg)
                    }
                    Err(e) => ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    },
                };
                Self::send(ctx, &reply);
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Unexpected binary message");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn state() -> AppState {
        let records = ["PS4", "X360", "Wii"]
            .iter()
            .enumerate()
            .map(|(i, console)| Record {
                title: format!("game {}", i),
                console: console.to_string(),
                genre: "Action".to_string(),
                publisher: "Acme".to_string(),
                year: 2008 + i as i32,
                total_sales: Some(1.0 + i as f64),
                na_sales: None,
                pal_sales: None,
                jp_sales: None,
            })
            .collect();
        AppState::new(Arc::new(Dataset::from_records(records)))
    }

    #[test]
    fn test_respond_controls() {
        match state().respond(ClientMessage::Controls) {
            ServerMessage::Controls(controls) => {
                assert_eq!(controls.platforms, vec!["PS4", "Wii", "X360"]);
                assert_eq!(controls.year_bounds, (2008, 2010));
            }
            other => panic!("expected Controls, got {:?}", other),
        }
    }

    #[test]
    fn test_respond_render() {
        let request = RenderRequest {
            consoles: Some(vec!["Wii".to_string(), "X360".to_string()]),
            year_min: None,
            year_max: None,
        };
        match state().respond(ClientMessage::Render(request)) {
            ServerMessage::Dashboard(dashboard) => {
                assert_eq!(dashboard.matched_rows, 2);
                assert_eq!(dashboard.panels.len(), 10);
            }
            other => panic!("expected Dashboard, got {:?}", other),
        }
    }
}

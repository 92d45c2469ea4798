//! Testing utilities for the harness
//!
//! [`MockBus`] is an in-process [`ServiceBus`] that reproduces the
//! videooutput service's observable behavior: request validation with the
//! service's error codes, the sink/client state the scenarios assert on, and
//! a status snapshot posted to every subscriber after each mutation. It is a
//! test double, not a service: no bus, no hardware, no timing.

use async_trait::async_trait;
use lunacheck_protocol::methods;
use lunacheck_protocol::response::error_codes;
use lunacheck_protocol::{ScanType, Sink, SinkStatus, Source, StatusPayload, VideoRect};
use lunacheck_transport::{Result as BusResult, ServiceBus, Subscription, TransportError};
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

/// Panel size the mock reports for full-screen windows
pub const PANEL: VideoRect = VideoRect {
    x: 0,
    y: 0,
    width: 3840,
    height: 2160,
};

const MIN_DOWNSCALE_WIDTH: u32 = 480;
const MIN_DOWNSCALE_HEIGHT: u32 = 270;

#[derive(Debug, Clone)]
struct SinkState {
    name: Sink,
    connected: bool,
    client_id: String,
    muted: bool,
    opacity: u8,
    z_order: i32,
    applied_input: VideoRect,
    scaled_output: VideoRect,
}

impl SinkState {
    fn new(name: Sink) -> Self {
        Self {
            name,
            connected: false,
            client_id: "unknown".to_string(),
            muted: false,
            opacity: 0,
            z_order: 0,
            applied_input: VideoRect::zero(),
            scaled_output: VideoRect::zero(),
        }
    }

    fn reset(&mut self) {
        self.connected = false;
        self.muted = false;
        self.opacity = 0;
        self.z_order = 0;
        self.applied_input = VideoRect::zero();
        self.scaled_output = VideoRect::zero();
    }
}

#[derive(Debug, Clone)]
struct ClientState {
    id: String,
    sink: Option<Sink>,
    source: Option<Source>,
    source_port: u8,
    source_rect: VideoRect,
    frame_rate: f64,
    content_type: String,
    scan_type: Option<ScanType>,
    full_screen: bool,
}

impl ClientState {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sink: None,
            source: None,
            source_port: 0,
            source_rect: VideoRect::zero(),
            frame_rate: 0.0,
            content_type: "unknown".to_string(),
            scan_type: None,
            full_screen: false,
        }
    }
}

struct ServiceState {
    sinks: Vec<SinkState>,
    clients: Vec<ClientState>,
    subscribers: Vec<mpsc::UnboundedSender<Value>>,
    negative_position: bool,
}

/// Mock videooutput service speaking the [`ServiceBus`] interface
///
/// State starts with both hardware sinks present and nothing connected,
/// the same as a freshly booted service.
#[derive(Clone)]
pub struct MockBus {
    state: Arc<Mutex<ServiceState>>,
    await_timeout: Duration,
}

impl MockBus {
    /// Mock with negative window positions accepted (cropped), like the
    /// device builds the position sweeps were written for
    pub fn new() -> Self {
        Self::with_negative_position(true)
    }

    /// Mock with an explicit negative-position capability
    pub fn with_negative_position(enabled: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServiceState {
                sinks: vec![SinkState::new(Sink::Main), SinkState::new(Sink::Sub0)],
                clients: Vec::new(),
                subscribers: Vec::new(),
                negative_position: enabled,
            })),
            await_timeout: Duration::from_secs(1),
        }
    }

    /// Override the default subscription await timeout
    pub fn with_await_timeout(mut self, timeout: Duration) -> Self {
        self.await_timeout = timeout;
        self
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceBus for MockBus {
    async fn call(&self, method: &str, params: Value) -> BusResult<Value> {
        let mut state = self.state.lock().await;
        Ok(state.dispatch(method, &params))
    }

    async fn subscribe(&self, method: &str, _params: Value) -> BusResult<Subscription> {
        if method != methods::GET_STATUS {
            return Err(TransportError::SubscriptionRejected(format!(
                "{} is not subscribable",
                method
            )));
        }
        let mut state = self.state.lock().await;
        let mut first = state.build_status();
        first["returnValue"] = json!(true);
        first["subscribed"] = json!(true);
        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.push(tx);
        Ok(Subscription::from_stream(first, rx, self.await_timeout))
    }
}

fn error(code: i64, text: impl Into<String>) -> Value {
    json!({"returnValue": false, "errorCode": code, "errorText": text.into()})
}

fn success() -> Value {
    json!({"returnValue": true})
}

fn opt_str(params: &Value, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

fn opt_u64(params: &Value, key: &str) -> Option<u64> {
    params.get(key).and_then(Value::as_u64)
}

fn opt_bool(params: &Value, key: &str) -> Option<bool> {
    params.get(key).and_then(Value::as_bool)
}

fn opt_rect(params: &Value, key: &str) -> Option<VideoRect> {
    params
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

impl ServiceState {
    fn dispatch(&mut self, method: &str, params: &Value) -> Value {
        match method {
            methods::REGISTER => self.register(params),
            methods::UNREGISTER => self.unregister(params),
            methods::CONNECT => self.connect(params),
            methods::DISCONNECT => self.disconnect(params),
            methods::BLANK_VIDEO => self.blank_video(params),
            methods::SET_VIDEO_DATA => self.set_video_data(params),
            methods::SET_DISPLAY_WINDOW => self.set_display_window(params),
            methods::SET_COMPOSITING => self.set_compositing(params),
            methods::GET_STATUS => self.get_status(params),
            _ => error(error_codes::NOT_IMPLEMENTED, "Not implemented"),
        }
    }

    fn sink_index(&self, name: &str) -> Option<usize> {
        let sink = Sink::from_str(name).ok()?;
        self.sinks.iter().position(|state| state.name == sink)
    }

    fn client_index(&self, id: &str) -> Option<usize> {
        self.clients.iter().position(|client| client.id == id)
    }

    fn add_client(&mut self, id: &str) -> bool {
        if self.client_index(id).is_some() {
            return false;
        }
        self.clients.push(ClientState::new(id));
        true
    }

    fn remove_client(&mut self, id: &str) -> bool {
        match self.client_index(id) {
            Some(index) => {
                self.clients.remove(index);
                true
            }
            None => false,
        }
    }

    fn build_status(&self) -> Value {
        let rows = self.sinks.iter().map(|sink| self.status_row(sink)).collect();
        serde_json::to_value(StatusPayload::subscribed(rows))
            .unwrap_or_else(|_| json!({"video": []}))
    }

    fn status_row(&self, sink: &SinkState) -> SinkStatus {
        let client = if sink.connected {
            self.client_index(&sink.client_id)
                .map(|index| &self.clients[index])
        } else {
            None
        };

        let mut row = SinkStatus::disconnected(sink.name);
        row.connected = sink.connected;
        row.context = sink.client_id.clone();
        row.muted = sink.muted;
        row.opacity = sink.opacity;
        row.z_order = sink.z_order;
        row.display_output = sink.scaled_output;
        row.source_input = sink.applied_input;
        if let Some(client) = client {
            row.connected_source = client.source;
            row.connected_source_port = client.source_port;
            row.frame_rate = client.frame_rate;
            row.content_type = client.content_type.clone();
            row.scan_type = match client.scan_type {
                Some(ScanType::Progressive) => "progressive".to_string(),
                Some(ScanType::Interlaced) => "interlaced".to_string(),
                None => "unknown".to_string(),
            };
            row.width = client.source_rect.width;
            row.height = client.source_rect.height;
            row.full_screen = client.full_screen;
        }
        row
    }

    fn post_update(&mut self) {
        let payload = self.build_status();
        self.subscribers
            .retain(|subscriber| subscriber.send(payload.clone()).is_ok());
    }

    fn register(&mut self, params: &Value) -> Value {
        let Some(context) = opt_str(params, "context") else {
            return error(error_codes::SCHEMA_VALIDATION, "context is required");
        };
        if !self.add_client(&context) {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("{} is already registered", context),
            );
        }
        success()
    }

    fn unregister(&mut self, params: &Value) -> Value {
        let Some(context) = opt_str(params, "context") else {
            return error(error_codes::SCHEMA_VALIDATION, "context is required");
        };
        if !self.remove_client(&context) {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("{} is not registered.", context),
            );
        }
        success()
    }

    fn connect(&mut self, params: &Value) -> Value {
        let (Some(source), Some(port), Some(sink_name)) = (
            opt_str(params, "source"),
            opt_u64(params, "sourcePort"),
            opt_str(params, "sink"),
        ) else {
            return error(
                error_codes::SCHEMA_VALIDATION,
                "source, sourcePort and sink are required",
            );
        };
        let context = opt_str(params, "context");

        let Some(sink_index) = self.sink_index(&sink_name) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid sink: {}", sink_name),
            );
        };
        let Ok(source) = Source::from_str(&source) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("unsupported videoSource type:{}", source),
            );
        };
        let Ok(port) = u8::try_from(port) else {
            return error(error_codes::SCHEMA_VALIDATION, "sourcePort out of range");
        };

        // A connected sink is silently reconnected; subscribers see the
        // intermediate disconnected state.
        if self.sinks[sink_index].connected {
            self.sinks[sink_index].reset();
            self.post_update();
            self.sinks[sink_index].client_id = "unknown".to_string();
        }

        let client_id = match &context {
            Some(context) => {
                if self.client_index(context).is_none() {
                    return error(
                        error_codes::INVALID_PARAMETERS,
                        format!("Invalid clientId: {}", context),
                    );
                }
                context.clone()
            }
            None => {
                // No register() flow: the sink name doubles as the context.
                if !self.add_client(&sink_name) {
                    return error(
                        error_codes::INVALID_PARAMETERS,
                        format!("{} is already registered", sink_name),
                    );
                }
                sink_name.clone()
            }
        };

        let Some(client_index) = self.client_index(&client_id) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid clientId: {}", client_id),
            );
        };

        let sink = self.sinks[sink_index].name;
        self.sinks[sink_index].connected = true;
        self.sinks[sink_index].client_id = client_id.clone();

        let client = &mut self.clients[client_index];
        client.sink = Some(sink);
        client.source = Some(source);
        client.source_port = port;

        self.post_update();
        json!({"returnValue": true, "planeID": sink_index})
    }

    fn disconnect(&mut self, params: &Value) -> Value {
        let Some(sink_name) = opt_str(params, "sink") else {
            return error(error_codes::SCHEMA_VALIDATION, "sink is required");
        };
        let context = opt_str(params, "context");

        let Some(sink_index) = self.sink_index(&sink_name) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid sink: {}", sink_name),
            );
        };
        if !self.sinks[sink_index].connected {
            return error(error_codes::VIDEO_NOT_CONNECTED, "Video not connected");
        }

        self.sinks[sink_index].reset();
        self.post_update();
        self.sinks[sink_index].client_id = "unknown".to_string();

        // Implicit clients vanish with the connection; registered clients
        // stay until unregister.
        if context.is_none() && !self.remove_client(&sink_name) {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("{} is not registered.", sink_name),
            );
        }

        success()
    }

    fn blank_video(&mut self, params: &Value) -> Value {
        let (Some(sink_name), Some(blank)) =
            (opt_str(params, "sink"), opt_bool(params, "blank"))
        else {
            return error(error_codes::SCHEMA_VALIDATION, "sink and blank are required");
        };
        let Some(sink_index) = self.sink_index(&sink_name) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid sink: {}", sink_name),
            );
        };

        // Blanking an already-muted sink is a no-op with no status event.
        if blank && self.sinks[sink_index].muted {
            return success();
        }

        self.sinks[sink_index].muted = blank;
        self.post_update();
        success()
    }

    fn set_video_data(&mut self, params: &Value) -> Value {
        let (Some(width), Some(height)) = (opt_u64(params, "width"), opt_u64(params, "height"))
        else {
            return error(error_codes::SCHEMA_VALIDATION, "width and height are required");
        };
        let Some(frame_rate) = params.get("frameRate").and_then(Value::as_f64) else {
            return error(error_codes::SCHEMA_VALIDATION, "frameRate is required");
        };
        if frame_rate < 0.0 {
            return error(error_codes::SCHEMA_VALIDATION, "frameRate must be >= 0");
        }
        let scan_type = match opt_str(params, "scanType").as_deref() {
            None => None,
            Some("progressive") | Some("VIDEO_PROGRESSIVE") => Some(ScanType::Progressive),
            Some("interlaced") | Some("VIDEO_INTERLACED") => Some(ScanType::Interlaced),
            Some(other) => {
                return error(
                    error_codes::SCHEMA_VALIDATION,
                    format!("invalid scanType: {}", other),
                );
            }
        };
        let content_type =
            opt_str(params, "contentType").unwrap_or_else(|| "unknown".to_string());
        let sink_name = opt_str(params, "sink").unwrap_or_default();
        let client_id = opt_str(params, "context").unwrap_or_else(|| sink_name.clone());

        let Some(client_index) = self.client_index(&client_id) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid clientId: {}", client_id),
            );
        };
        let Some(sink) = self.clients[client_index].sink else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid sink: {}", sink_name),
            );
        };
        let Some(sink_index) = self.sink_index(sink.as_str()) else {
            return error(error_codes::UNKNOWN, "Unknown error");
        };
        if !self.sinks[sink_index].connected {
            return error(error_codes::VIDEO_NOT_CONNECTED, "Video not connected");
        }

        {
            let client = &mut self.clients[client_index];
            client.source_rect = VideoRect::sized(width as u32, height as u32);
            client.content_type = content_type;
            client.frame_rate = frame_rate;
            client.scan_type = Some(scan_type.unwrap_or(ScanType::Interlaced));
        }

        let client = self.clients[client_index].clone();
        if self.sinks[sink_index].scaled_output.is_valid() || client.full_screen {
            let input = client.source_rect;
            let output = if client.full_screen {
                PANEL
            } else {
                self.sinks[sink_index].scaled_output
            };
            self.apply_rects(sink_index, client.source_rect, input, output);
        }

        self.post_update();
        success()
    }

    fn set_display_window(&mut self, params: &Value) -> Value {
        let Some(full_screen) = opt_bool(params, "fullScreen") else {
            return error(error_codes::SCHEMA_VALIDATION, "fullScreen is required");
        };
        let sink_name = opt_str(params, "sink").unwrap_or_default();
        let client_id = opt_str(params, "context").unwrap_or_else(|| sink_name.clone());
        let display_output_set = params.get("displayOutput").is_some();
        let source_input_set = params.get("sourceInput").is_some();
        let display_output_param = opt_rect(params, "displayOutput");
        let source_input_param = opt_rect(params, "sourceInput");
        if display_output_set && display_output_param.is_none() {
            return error(error_codes::SCHEMA_VALIDATION, "malformed displayOutput");
        }
        if source_input_set && source_input_param.is_none() {
            return error(error_codes::SCHEMA_VALIDATION, "malformed sourceInput");
        }
        let opacity = match opt_u64(params, "opacity") {
            None => None,
            Some(value) if value <= 255 => Some(value as u8),
            Some(_) => return error(error_codes::SCHEMA_VALIDATION, "opacity out of range"),
        };

        let Some(client_index) = self.client_index(&client_id) else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid client: {}", client_id),
            );
        };
        let Some(sink) = self.clients[client_index].sink else {
            return error(
                error_codes::INVALID_PARAMETERS,
                format!("Invalid sink: {}", sink_name),
            );
        };
        let Some(sink_index) = self.sink_index(sink.as_str()) else {
            return error(error_codes::UNKNOWN, "Unknown error");
        };

        let mut display_output = if full_screen {
            PANEL
        } else {
            display_output_param.unwrap_or_default()
        };
        let mut input_rect = source_input_param.unwrap_or_default();
        let source_rect = self.clients[client_index].source_rect;

        if !self.sinks[sink_index].connected {
            return error(error_codes::VIDEO_NOT_CONNECTED, "Video not connected");
        }
        if !self.negative_position && !PANEL.contains(&display_output) {
            return error(error_codes::INVALID_PARAMETERS, "displayOutput outside screen");
        }
        if source_rect.is_valid() && input_rect.is_valid() && !source_rect.contains(&input_rect) {
            return error(error_codes::INVALID_PARAMETERS, "inputRect outside video size");
        }
        if display_output.width == 0 && display_output.height == 0 {
            return error(
                error_codes::INVALID_PARAMETERS,
                "need to specify displayOutput when fullscreen = false",
            );
        }
        if (display_output.width < input_rect.width && display_output.width < MIN_DOWNSCALE_WIDTH)
            || (display_output.height < input_rect.height
                && display_output.height < MIN_DOWNSCALE_HEIGHT)
        {
            return error(
                error_codes::DOWNSCALE_LIMIT,
                format!(
                    "unable to downscale below {},{}, requested, {},{}",
                    MIN_DOWNSCALE_WIDTH, MIN_DOWNSCALE_HEIGHT,
                    display_output.width, display_output.height
                ),
            );
        }
        if (display_output.width > input_rect.width && display_output.width > PANEL.width)
            || (display_output.height > input_rect.height && display_output.height > PANEL.height)
        {
            return error(
                error_codes::UPSCALE_LIMIT,
                format!(
                    "unable to upscale above {},{}, requested, {},{}",
                    PANEL.width, PANEL.height, display_output.width, display_output.height
                ),
            );
        }

        self.clients[client_index].full_screen = full_screen;
        if !source_input_set {
            input_rect = source_rect;
        }

        if self.negative_position {
            crop_to_panel(&mut display_output, &mut input_rect);
        }

        let scaled_output = if self.clients[client_index].full_screen {
            PANEL
        } else {
            display_output
        };
        self.apply_rects(sink_index, source_rect, input_rect, scaled_output);

        if let Some(opacity) = opacity {
            self.sinks[sink_index].opacity = opacity;
        }

        self.post_update();
        success()
    }

    fn set_compositing(&mut self, params: &Value) -> Value {
        let Some(entries) = params.get("composeOrder").and_then(Value::as_array) else {
            return error(error_codes::SCHEMA_VALIDATION, "composeOrder is required");
        };
        let max_z_order = self.sinks.len() as i64 - 1;

        let mut parsed = Vec::new();
        let mut z_orders = std::collections::HashSet::new();
        let mut named_sinks = std::collections::HashSet::new();
        for entry in entries {
            let (Some(sink_name), Some(opacity), Some(z_order)) = (
                opt_str(entry, "sink"),
                entry.get("opacity").and_then(Value::as_i64),
                entry.get("zOrder").and_then(Value::as_i64),
            ) else {
                return error(
                    error_codes::SCHEMA_VALIDATION,
                    "sink, opacity and zOrder are required",
                );
            };
            let Some(sink_index) = self.sink_index(&sink_name) else {
                return error(error_codes::INVALID_PARAMETERS, "Invalid sink value");
            };
            if !(0..=255).contains(&opacity) || !(0..=max_z_order).contains(&z_order) {
                return error(
                    error_codes::INVALID_PARAMETERS,
                    format!(
                        "Zorder values must be in the range 0-{} and opacity values must be in the range 0-255",
                        max_z_order
                    ),
                );
            }
            if !z_orders.insert(z_order) {
                return error(
                    error_codes::INVALID_PARAMETERS,
                    "Two windows cannot have the same zOrder",
                );
            }
            named_sinks.insert(sink_index);
            parsed.push((sink_index, opacity as u8, z_order as i32));
        }

        // Untouched sinks keep their z-order, which must stay unique too.
        for (index, sink) in self.sinks.iter().enumerate() {
            if named_sinks.contains(&index) {
                continue;
            }
            if !z_orders.insert(sink.z_order as i64) {
                return error(
                    error_codes::INVALID_PARAMETERS,
                    "Two windows cannot have the same zOrder",
                );
            }
        }

        for (sink_index, opacity, z_order) in parsed {
            self.sinks[sink_index].opacity = opacity;
            self.sinks[sink_index].z_order = z_order;
        }

        self.post_update();
        success()
    }

    fn get_status(&mut self, params: &Value) -> Value {
        let subscribe = opt_bool(params, "subscribe").unwrap_or(false);
        let mut status = self.build_status();
        status["returnValue"] = json!(true);
        status["subscribed"] = json!(subscribe);
        status
    }

    /// Mirror of the service's output-rect application order: the display
    /// output sticks immediately, the source input only once media exists.
    fn apply_rects(
        &mut self,
        sink_index: usize,
        source_rect: VideoRect,
        input_rect: VideoRect,
        output_rect: VideoRect,
    ) {
        let sink = &mut self.sinks[sink_index];
        sink.scaled_output = output_rect;
        if !source_rect.is_valid() {
            return;
        }
        sink.applied_input = if input_rect.is_valid() {
            input_rect
        } else {
            source_rect
        };
    }
}

/// Crop an off-panel output window back onto the panel, shrinking the
/// source window by the same ratio so the visible content stays put.
fn crop_to_panel(output: &mut VideoRect, input: &mut VideoRect) {
    if !input.is_valid() || !output.is_valid() {
        return;
    }
    let w_ratio = output.width as f64 / input.width as f64;
    let h_ratio = output.height as f64 / input.height as f64;

    if output.x < 0 {
        if output.width as i32 + output.x > 0 {
            input.width = ((output.width as i32 + output.x) as f64 / w_ratio) as u32;
            output.width = (output.width as i32 + output.x) as u32;
        } else {
            input.width = 0;
            output.width = 0;
        }
        input.x = ((input.x - output.x) as f64 / w_ratio) as i32;
        output.x = 0;
    } else if output.x as u32 + output.width > PANEL.width {
        input.width = ((PANEL.width - output.x as u32) as f64 / w_ratio) as u32;
        output.width = PANEL.width - output.x as u32;
    }

    if output.y < 0 {
        if output.height as i32 + output.y > 0 {
            input.height = ((output.height as i32 + output.y) as f64 / h_ratio) as u32;
            output.height = (output.height as i32 + output.y) as u32;
        } else {
            input.height = 0;
            output.height = 0;
        }
        input.y = ((input.y - output.y) as f64 / h_ratio) as i32;
        output.y = 0;
    } else if output.y as u32 + output.height > PANEL.height {
        input.height = ((PANEL.height - output.y as u32) as f64 / h_ratio) as u32;
        output.height = PANEL.height - output.y as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunacheck_protocol::Pattern;

    async fn connected_bus() -> MockBus {
        let bus = MockBus::new();
        let response = bus
            .call(
                methods::CONNECT,
                json!({"outputMode": "DISPLAY", "sink": "MAIN", "source": "HDMI", "sourcePort": 3}),
            )
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));
        bus
    }

    #[tokio::test]
    async fn test_connect_posts_status_to_subscribers() {
        let bus = MockBus::new();
        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        assert_eq!(sub.first_response()["subscribed"], json!(true));

        bus.call(
            methods::CONNECT,
            json!({"outputMode": "DISPLAY", "sink": "MAIN", "source": "HDMI", "sourcePort": 3}),
        )
        .await
        .unwrap();

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{"sink": "MAIN", "connectedSource": "HDMI", "connectedSourcePort": 3}]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_disconnect_clears_source() {
        let bus = connected_bus().await;
        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();

        let response = bus
            .call(methods::DISCONNECT, json!({"sink": "MAIN"}))
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{"sink": "MAIN", "connected": false, "connectedSource": null}]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_is_error_100() {
        let bus = MockBus::new();
        let response = bus
            .call(methods::DISCONNECT, json!({"sink": "MAIN"}))
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(false));
        assert_eq!(response["errorCode"], json!(error_codes::VIDEO_NOT_CONNECTED));
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_sink_and_source() {
        let bus = MockBus::new();
        let response = bus
            .call(
                methods::CONNECT,
                json!({"outputMode": "DISPLAY", "sink": "NOPE", "source": "HDMI", "sourcePort": 0}),
            )
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::INVALID_PARAMETERS));

        let response = bus
            .call(
                methods::CONNECT,
                json!({"outputMode": "DISPLAY", "sink": "MAIN", "source": "TAPE", "sourcePort": 0}),
            )
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::INVALID_PARAMETERS));
    }

    #[tokio::test]
    async fn test_blank_when_already_muted_posts_no_update() {
        let bus = connected_bus().await;
        bus.call(methods::BLANK_VIDEO, json!({"sink": "MAIN", "blank": true}))
            .await
            .unwrap();

        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        let response = bus
            .call(methods::BLANK_VIDEO, json!({"sink": "MAIN", "blank": true}))
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));
        assert!(
            sub.await_update_timeout(Duration::from_millis(50))
                .await
                .is_none()
        );
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_display_window_before_media_reports_zero_input() {
        let bus = connected_bus().await;
        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();

        bus.call(
            methods::SET_DISPLAY_WINDOW,
            json!({
                "sink": "MAIN",
                "fullScreen": false,
                "sourceInput": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                "displayOutput": {"x": 400, "y": 400, "width": 1920, "height": 1080},
            }),
        )
        .await
        .unwrap();

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{
                "sink": "MAIN",
                "sourceInput": {"x": 0, "y": 0, "width": 0, "height": 0},
                "displayOutput": {"x": 400, "y": 400, "width": 1920, "height": 1080},
            }]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_video_data_after_window_applies_source_input() {
        let bus = connected_bus().await;
        bus.call(
            methods::SET_DISPLAY_WINDOW,
            json!({
                "sink": "MAIN",
                "fullScreen": false,
                "sourceInput": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                "displayOutput": {"x": 400, "y": 400, "width": 1920, "height": 1080},
            }),
        )
        .await
        .unwrap();

        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        bus.call(
            methods::SET_VIDEO_DATA,
            json!({
                "sink": "MAIN",
                "contentType": "media",
                "frameRate": 29.5,
                "width": 1920,
                "height": 1080,
                "scanType": "progressive",
            }),
        )
        .await
        .unwrap();

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{
                "sink": "MAIN",
                "width": 1920,
                "height": 1080,
                "frameRate": 29.5,
                "sourceInput": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                "displayOutput": {"x": 400, "y": 400, "width": 1920, "height": 1080},
            }]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_fullscreen_expands_to_panel() {
        let bus = connected_bus().await;
        bus.call(
            methods::SET_VIDEO_DATA,
            json!({
                "sink": "MAIN",
                "contentType": "media",
                "frameRate": 29.5,
                "width": 1920,
                "height": 1080,
                "scanType": "progressive",
            }),
        )
        .await
        .unwrap();

        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        bus.call(
            methods::SET_DISPLAY_WINDOW,
            json!({
                "sink": "MAIN",
                "fullScreen": true,
                "sourceInput": {"x": 0, "y": 0, "width": 1920, "height": 1080},
            }),
        )
        .await
        .unwrap();

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{
                "sink": "MAIN",
                "fullScreen": true,
                "displayOutput": {"x": 0, "y": 0, "width": 3840, "height": 2160},
            }]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_offscreen_window_rejected_without_negative_position() {
        let bus = MockBus::with_negative_position(false);
        bus.call(
            methods::CONNECT,
            json!({"outputMode": "DISPLAY", "sink": "MAIN", "source": "HDMI", "sourcePort": 3}),
        )
        .await
        .unwrap();

        let response = bus
            .call(
                methods::SET_DISPLAY_WINDOW,
                json!({
                    "sink": "MAIN",
                    "fullScreen": false,
                    "displayOutput": {"x": -200, "y": 0, "width": 1920, "height": 1080},
                }),
            )
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::INVALID_PARAMETERS));
    }

    #[tokio::test]
    async fn test_offscreen_window_cropped_with_negative_position() {
        let bus = connected_bus().await;
        bus.call(
            methods::SET_VIDEO_DATA,
            json!({"sink": "MAIN", "frameRate": 29.5, "width": 1920, "height": 1080}),
        )
        .await
        .unwrap();

        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        let response = bus
            .call(
                methods::SET_DISPLAY_WINDOW,
                json!({
                    "sink": "MAIN",
                    "fullScreen": false,
                    "sourceInput": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                    "displayOutput": {"x": -260, "y": 0, "width": 1920, "height": 1080},
                }),
            )
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));

        let update = sub.await_update().await.expect("status update");
        // 260 of 1920 output pixels hang off the left edge; the window and
        // the visible source shrink together.
        let pattern = Pattern::new(json!({
            "video": [{
                "sink": "MAIN",
                "displayOutput": {"x": 0, "y": 0, "width": 1660, "height": 1080},
                "sourceInput": {"x": 260, "y": 0, "width": 1660, "height": 1080},
            }]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_compositing_rejects_duplicate_z_order() {
        let bus = MockBus::new();
        let response = bus
            .call(
                methods::SET_COMPOSITING,
                json!({"composeOrder": [
                    {"sink": "MAIN", "opacity": 20, "zOrder": 1},
                    {"sink": "SUB0", "opacity": 31, "zOrder": 1},
                ]}),
            )
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::INVALID_PARAMETERS));
    }

    #[tokio::test]
    async fn test_compositing_applies_and_survives_display_window() {
        let bus = connected_bus().await;
        bus.call(
            methods::SET_COMPOSITING,
            json!({"composeOrder": [
                {"sink": "MAIN", "opacity": 20, "zOrder": 1},
                {"sink": "SUB0", "opacity": 31, "zOrder": 0},
            ]}),
        )
        .await
        .unwrap();

        let sub = bus.subscribe(methods::GET_STATUS, json!({})).await.unwrap();
        bus.call(
            methods::SET_DISPLAY_WINDOW,
            json!({"sink": "MAIN", "fullScreen": true, "opacity": 130}),
        )
        .await
        .unwrap();

        let update = sub.await_update().await.expect("status update");
        let pattern = Pattern::new(json!({
            "video": [{"sink": "MAIN", "opacity": 130, "zOrder": 1}]
        }));
        assert!(pattern.matches(&update), "update: {}", update);
        sub.cancel().await;
    }

    #[tokio::test]
    async fn test_register_flow() {
        let bus = MockBus::new();
        let response = bus
            .call(methods::REGISTER, json!({"context": "pipeline1"}))
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));

        // Double registration is refused.
        let response = bus
            .call(methods::REGISTER, json!({"context": "pipeline1"}))
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::INVALID_PARAMETERS));

        let response = bus
            .call(
                methods::CONNECT,
                json!({
                    "outputMode": "DISPLAY", "sink": "MAIN", "source": "HDMI",
                    "sourcePort": 3, "context": "pipeline1",
                }),
            )
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));

        let status = bus.call(methods::GET_STATUS, json!({})).await.unwrap();
        let pattern = Pattern::new(json!({
            "video": [{"sink": "MAIN", "context": "pipeline1"}]
        }));
        assert!(pattern.matches(&status), "status: {}", status);

        let response = bus
            .call(methods::UNREGISTER, json!({"context": "pipeline1"}))
            .await
            .unwrap();
        assert_eq!(response["returnValue"], json!(true));
    }

    #[tokio::test]
    async fn test_get_status_snapshot_not_subscribed() {
        let bus = MockBus::new();
        let status = bus.call(methods::GET_STATUS, json!({})).await.unwrap();
        assert_eq!(status["returnValue"], json!(true));
        assert_eq!(status["subscribed"], json!(false));
        assert_eq!(status["video"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_method_not_implemented() {
        let bus = MockBus::new();
        let response = bus
            .call("display/getVideoLimits", json!({"sink": "MAIN"}))
            .await
            .unwrap();
        assert_eq!(response["errorCode"], json!(error_codes::NOT_IMPLEMENTED));
    }
}

/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Dispatches tool calls to the tracker facade
/// 3. Writes one JSON-RPC response line per request

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::DocumentStore;
use crate::tools;
use crate::tracker::ClearAirTracker;
use crate::TrackerError;

/// MCP server driving one tracker
pub struct McpServer<S: DocumentStore> {
    tracker: ClearAirTracker<S>,
    /// Set once the client sends `notifications/initialized`
    initialized: bool,
}

impl<S: DocumentStore> McpServer<S> {
    pub fn new(tracker: ClearAirTracker<S>) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    pub fn tracker(&self) -> &ClearAirTracker<S> {
        &self.tracker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), TrackerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve JSON-RPC lines from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), TrackerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Handle one line of input; notifications and blank lines produce nothing
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        match request.id {
            Some(id) => Some(self.handle_request(id, &request.method, request.params)),
            None => {
                self.handle_notification(&request.method);
                None
            }
        }
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_request(
        &mut self,
        id: Value,
        method: &str,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        match method {
            "initialize" => self.handle_initialize(id, params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => respond(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => info!(
                "MCP client connected: {} (protocol {})",
                init.client_info.map(|c| c.name).unwrap_or_else(|| "unknown".to_string()),
                init.protocol_version
            ),
            Some(Err(e)) => warn!("Unrecognized initialize parameters: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Clear Air Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, result)
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool '{}'", tool_params.name);
        let args = Value::Object(tool_params.arguments);
        let tracker = &mut self.tracker;

        let outcome = match tool_params.name.as_str() {
            "habit_list" => invoke(args, |p| tools::list_habits(tracker, p)),
            "habit_add" => invoke(args, |p| tools::add_habit(tracker, p)),
            "habit_update" => invoke(args, |p| tools::update_habit(tracker, p)),
            "habit_delete" => invoke(args, |p| tools::delete_habit(tracker, p)),
            "habit_toggle_day" => invoke(args, |p| tools::toggle_habit_day(tracker, p)),
            "smoke_free_toggle_day" => invoke(args, |p| tools::toggle_smoke_free_day(tracker, p)),
            "smoke_free_status" => invoke(args, |p| tools::smoke_free_status(tracker, p)),
            "calendar_month" => invoke(args, |p| tools::calendar_month(tracker, p)),
            "profile_get" => invoke(args, |p| tools::get_profile(tracker, p)),
            "profile_save" => invoke(args, |p| tools::save_profile(tracker, p)),
            "theme_set" => invoke(args, |p| tools::set_theme(tracker, p)),
            "breathing_exercises" => invoke(args, tools::breathing_exercises),
            unknown => Ok(ToolCallResult::error(format!("Unknown tool: {}", unknown))),
        };

        match outcome {
            Ok(result) => respond(id, result),
            Err(e) => {
                let code = tracker_error_to_json_rpc_code(&e);
                if is_caller_error(code) {
                    respond(id, ToolCallResult::error(e.to_string()))
                } else {
                    error!("Tool '{}' failed: {}", tool_params.name, e);
                    JsonRpcResponse::error(id, code, e.to_string(), None)
                }
            }
        }
    }
}

/// Deserialize tool arguments, run the tool and wrap its response
///
/// Malformed arguments are the caller's to fix, so they come back as an error
/// tool result rather than a JSON-RPC error.
fn invoke<P, R, F>(args: Value, call: F) -> Result<ToolCallResult, TrackerError>
where
    P: DeserializeOwned,
    R: Serialize,
    F: FnOnce(P) -> Result<R, TrackerError>,
{
    let params: P = match serde_json::from_value(args) {
        Ok(p) => p,
        Err(e) => return Ok(ToolCallResult::error(format!("Invalid arguments: {}", e))),
    };

    let structured = serde_json::to_value(call(params)?)?;
    let text = structured
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(ToolCallResult::success(text, Some(structured)))
}

fn respond<T: Serialize>(id: Value, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
            None,
        ),
    }
}

fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schemars::schema_for!(P))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Every tool the server exposes, in `tools/list` order
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with current streak, best streak, completion rate and a recent-days strip",
        ),
        tool::<tools::AddHabitParams>("habit_add", "Add a new daily habit"),
        tool::<tools::UpdateHabitParams>(
            "habit_update",
            "Change a habit's title or description; history is kept",
        ),
        tool::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit and its completion history",
        ),
        tool::<tools::ToggleHabitDayParams>(
            "habit_toggle_day",
            "Mark or unmark a habit as done on a day (defaults to today)",
        ),
        tool::<tools::ToggleSmokeFreeDayParams>(
            "smoke_free_toggle_day",
            "Mark or unmark a day as smoke-free (defaults to today)",
        ),
        tool::<tools::SmokeFreeStatusParams>(
            "smoke_free_status",
            "Current and best smoke-free streak with health milestones",
        ),
        tool::<tools::CalendarMonthParams>(
            "calendar_month",
            "Month calendar marking smoke-free days or one habit's completions",
        ),
        tool::<tools::ProfileGetParams>("profile_get", "Show the user profile"),
        tool::<tools::ProfileSaveParams>(
            "profile_save",
            "Update profile fields; omitted fields keep their value, null clears optional ones",
        ),
        tool::<tools::ThemeSetParams>("theme_set", "Store the preferred app theme"),
        tool::<tools::BreathingExercisesParams>(
            "breathing_exercises",
            "Guided breathing exercises for cravings; pass a title to get the steps",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::storage::SqliteStorage;
    use chrono::{FixedOffset, Weekday};

    fn server() -> McpServer<SqliteStorage> {
        let config = TrackerConfig::new(Weekday::Mon, FixedOffset::east_opt(0).unwrap());
        let tracker =
            ClearAirTracker::open(SqliteStorage::open_in_memory().unwrap(), config).unwrap();
        McpServer::new(tracker)
    }

    fn call(server: &mut McpServer<SqliteStorage>, name: &str, arguments: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        let response = server.process_line(&request.to_string()).unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_tools_list_has_schemas() {
        let definitions = tool_definitions();

        assert_eq!(definitions.len(), 12);
        let toggle = definitions
            .iter()
            .find(|d| d.name == "habit_toggle_day")
            .unwrap();
        assert!(toggle.input_schema["properties"]["habit_id"].is_object());
        assert_eq!(toggle.input_schema["required"], json!(["habit_id"]));
    }

    #[test]
    fn test_notifications_get_no_response() {
        let mut server = server();
        let response =
            server.process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);

        assert!(response.is_none());
        assert!(server.is_initialized());
    }

    #[test]
    fn test_parse_error_and_unknown_method() {
        let mut server = server();

        let parse = serde_json::to_value(server.process_line("{not json").unwrap()).unwrap();
        assert_eq!(parse["error"]["code"], error_codes::PARSE_ERROR);

        let unknown = serde_json::to_value(
            server
                .process_line(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(unknown["id"], 7);
        assert_eq!(unknown["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_add_and_toggle_through_tools() {
        let mut server = server();

        let added = call(&mut server, "habit_add", json!({ "title": "Walk" }));
        assert_eq!(added["result"]["isError"], false);
        let habit_id = added["result"]["structuredContent"]["habit_id"]
            .as_str()
            .unwrap()
            .to_string();

        let toggled = call(&mut server, "habit_toggle_day", json!({ "habit_id": habit_id }));
        assert_eq!(toggled["result"]["structuredContent"]["completed"], true);
        assert_eq!(server.tracker().list_habits()[0].completions.len(), 1);
    }

    #[test]
    fn test_caller_errors_are_tool_results() {
        let mut server = server();

        let missing = call(&mut server, "habit_add", json!({}));
        assert_eq!(missing["result"]["isError"], true);

        let not_found = call(
            &mut server,
            "habit_toggle_day",
            json!({ "habit_id": crate::domain::HabitId::new().to_string() }),
        );
        assert_eq!(not_found["result"]["isError"], true);
        assert!(not_found["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Habit not found"));

        let unknown = call(&mut server, "habit_log", json!({}));
        assert_eq!(unknown["result"]["isError"], true);
    }

    #[test]
    fn test_breathing_exercises_tool() {
        let mut server = server();

        let all = call(&mut server, "breathing_exercises", json!({}));
        assert_eq!(all["result"]["structuredContent"]["exercises"].as_array().unwrap().len(), 4);

        let one = call(&mut server, "breathing_exercises", json!({ "title": "box" }));
        let exercise = &one["result"]["structuredContent"]["exercises"][0];
        assert_eq!(exercise["title"], "Box Breathing");
        assert_eq!(exercise["duration_seconds"], 80);

        let none = call(&mut server, "breathing_exercises", json!({ "title": "humming" }));
        assert_eq!(none["result"]["isError"], true);
    }
}

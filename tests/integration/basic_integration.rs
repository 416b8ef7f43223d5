/// Basic integration tests driving the MCP server end to end
use chrono::{FixedOffset, Weekday};
use clear_air_tracker::*;
use serde_json::{json, Value};

fn tracker() -> ClearAirTracker<SqliteStorage> {
    let config = TrackerConfig::new(Weekday::Mon, FixedOffset::east_opt(0).unwrap());
    ClearAirTracker::open(SqliteStorage::open_in_memory().unwrap(), config)
        .expect("Failed to open tracker")
}

fn request(id: u64, method: &str, params: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }).to_string()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

async fn serve(server: &mut McpServer<SqliteStorage>, lines: &[String]) -> Vec<Value> {
    let input = lines.join("\n") + "\n";
    let mut output = Vec::new();

    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("Server loop failed");

    String::from_utf8(output)
        .expect("Output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Response is JSON"))
        .collect()
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_handshake_and_tool_list() {
        let mut server = McpServer::new(tracker());
        let lines = vec![
            request(
                1,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "1.0" }
                }),
            ),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
            request(2, "tools/list", json!({})),
        ];

        let responses = serve(&mut server, &lines).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "Clear Air Tracker");
        assert!(server.is_initialized());

        let names: Vec<&str> = responses[1]["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"smoke_free_toggle_day"));
        assert!(names.contains(&"calendar_month"));
        assert!(responses[1]["result"]["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_habit_workflow_over_stdio() {
        let mut server = McpServer::new(tracker());

        let added = serve(
            &mut server,
            &[tool_call(1, "habit_add", json!({ "title": "Evening walk" }))],
        )
        .await;
        let habit_id = added[0]["result"]["structuredContent"]["habit_id"]
            .as_str()
            .unwrap()
            .to_string();

        let responses = serve(
            &mut server,
            &[
                tool_call(2, "habit_toggle_day", json!({ "habit_id": habit_id })),
                tool_call(3, "habit_list", json!({ "recent_days": 5 })),
                tool_call(4, "habit_delete", json!({ "habit_id": habit_id })),
                tool_call(5, "habit_list", json!({})),
            ],
        )
        .await;

        assert_eq!(responses[0]["result"]["structuredContent"]["current_streak"], 1);
        let listed = &responses[1]["result"]["structuredContent"]["habits"][0];
        assert_eq!(listed["title"], "Evening walk");
        assert_eq!(listed["recent"].as_array().unwrap().len(), 5);
        assert_eq!(responses[2]["result"]["structuredContent"]["success"], true);
        assert!(responses[3]["result"]["structuredContent"]["habits"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_smoke_free_workflow_over_stdio() {
        let mut server = McpServer::new(tracker());

        let responses = serve(
            &mut server,
            &[
                tool_call(1, "smoke_free_toggle_day", json!({})),
                tool_call(2, "smoke_free_status", json!({})),
                tool_call(3, "theme_set", json!({ "theme": "dark" })),
                tool_call(4, "profile_get", json!({})),
            ],
        )
        .await;

        assert_eq!(responses[0]["result"]["structuredContent"]["smoke_free"], true);
        assert_eq!(responses[0]["result"]["structuredContent"]["max_streak_raised"], true);
        let status = &responses[1]["result"]["structuredContent"];
        assert_eq!(status["current_streak"], 1);
        assert_eq!(status["milestones"]["next"]["title"], "2 Days");
        assert_eq!(responses[3]["result"]["structuredContent"]["profile"]["theme"], "Dark");
    }

    #[tokio::test]
    async fn test_bad_input_keeps_serving() {
        let mut server = McpServer::new(tracker());

        let responses = serve(
            &mut server,
            &[
                "this is not json".to_string(),
                tool_call(1, "habit_toggle_day", json!({ "habit_id": "nope" })),
                request(2, "tools/call", Value::Null),
                tool_call(3, "habit_add", json!({ "title": "Still alive" })),
            ],
        )
        .await;

        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["result"]["isError"], true);
        assert_eq!(responses[2]["error"]["code"], -32602);
        assert_eq!(responses[3]["result"]["isError"], false);
        assert_eq!(server.tracker().list_habits().len(), 1);
    }

    #[test]
    fn test_change_events_reach_subscribers() {
        let mut tracker = tracker();
        let mut events = tracker.subscribe();

        let habit = tracker.add_habit("Journal".to_string(), None).unwrap();
        tracker.delete_habit(&habit.id).unwrap();

        let first = tokio_test::block_on(events.recv()).unwrap();
        let second = tokio_test::block_on(events.recv()).unwrap();
        assert_eq!(first, ChangeEvent::HabitAdded { habit_id: habit.id.clone() });
        assert_eq!(second, ChangeEvent::HabitDeleted { habit_id: habit.id });
    }
}

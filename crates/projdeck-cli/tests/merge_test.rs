use projdeck_testing::TestWorld;
use serde_json::Value;

fn entries_json(world: &TestWorld) -> Vec<Value> {
    let output = world
        .command()
        .arg("list")
        .arg("--format")
        .arg("json")
        .output()
        .expect("list runs");
    assert!(
        output.status.success(),
        "list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn find<'a>(entries: &'a [Value], key: &str) -> &'a Value {
    entries
        .iter()
        .find(|e| e["key"] == key)
        .unwrap_or_else(|| panic!("no entry with key {}", key))
}

#[test]
fn test_activity_merges_to_the_maximum_across_machines() {
    let world = TestWorld::new();
    world.add_project("widget", r#"{"id": "widget", "title": "Widget"}"#);
    world.add_git_remote("widget", "git@github.com:acme/widget.git");

    world.write_machine_doc(
        "peer-a",
        r#"{
  "machine_id": "peer-a",
  "machine_name": "desktop",
  "last_sync": "2026-08-01T00:00:00Z",
  "repos": {
    "github.com/acme/widget": {
      "local_path": "/home/peer/widget",
      "last_opened": "2026-03-01T00:00:00Z",
      "last_pushed": null
    }
  }
}"#,
    );
    world.write_machine_doc(
        "peer-b",
        r#"{
  "machine_id": "peer-b",
  "machine_name": "server",
  "last_sync": "2026-08-01T00:00:00Z",
  "repos": {
    "github.com/acme/widget": {
      "local_path": "/srv/widget",
      "last_opened": null,
      "last_pushed": "2026-06-15T00:00:00Z"
    }
  }
}"#,
    );

    let entries = entries_json(&world);
    let widget = find(&entries, "github.com/acme/widget");

    assert_eq!(widget["presence"], "cloned");
    assert_eq!(widget["most_recent_activity"], "2026-06-15T00:00:00Z");
    let machines: Vec<&str> = widget["machines"]
        .as_array()
        .expect("machines array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(machines, vec!["desktop", "server", "test-laptop"]);
}

#[test]
fn test_remote_clone_on_a_peer_machine_is_still_cloned_here() {
    let world = TestWorld::new();
    // Something must exist locally for the scan to have a root.
    world.add_project("anchor", r#"{"id": "anchor"}"#);

    world.write_machine_doc(
        "peer-a",
        r#"{
  "machine_id": "peer-a",
  "machine_name": "desktop",
  "last_sync": "2026-08-01T00:00:00Z",
  "repos": {
    "github.com/acme/elsewhere": {
      "local_path": "/home/peer/elsewhere",
      "last_opened": "2026-05-01T00:00:00Z",
      "last_pushed": null
    }
  }
}"#,
    );

    let entries = entries_json(&world);
    let remote = find(&entries, "github.com/acme/elsewhere");
    assert_eq!(remote["presence"], "cloned");
    // The name for a never-declared identity falls back to the repo name.
    assert_eq!(remote["title"], "elsewhere");
    assert!(remote["local_path"].is_null());
}

#[test]
fn test_identity_known_nowhere_is_dropped() {
    let world = TestWorld::new();
    world.add_project("anchor", r#"{"id": "anchor"}"#);

    // A peer entry with no local clone and no remote overlay to back it.
    world.write_machine_doc(
        "peer-a",
        r#"{
  "machine_id": "peer-a",
  "machine_name": "desktop",
  "last_sync": "2026-08-01T00:00:00Z",
  "repos": {
    "github.com/acme/ghost": {
      "local_path": null,
      "last_opened": "2026-05-01T00:00:00Z",
      "last_pushed": null
    }
  }
}"#,
    );

    let entries = entries_json(&world);
    assert!(entries.iter().all(|e| e["key"] != "github.com/acme/ghost"));
}

#[test]
fn test_entries_sort_most_recent_first_with_inactive_last() {
    let world = TestWorld::new();
    world.add_project("quiet", r#"{"id": "quiet", "title": "Quiet"}"#);
    world.add_project("busy", r#"{"id": "busy", "title": "Busy"}"#);
    world.add_git_remote("busy", "git@github.com:acme/busy.git");

    world.write_machine_doc(
        "peer-a",
        r#"{
  "machine_id": "peer-a",
  "machine_name": "desktop",
  "last_sync": "2026-08-01T00:00:00Z",
  "repos": {
    "github.com/acme/busy": {
      "local_path": "/home/peer/busy",
      "last_opened": "2026-07-01T00:00:00Z",
      "last_pushed": null
    }
  }
}"#,
    );

    let entries = entries_json(&world);
    let keys: Vec<&str> = entries.iter().filter_map(|e| e["key"].as_str()).collect();
    assert_eq!(keys, vec!["github.com/acme/busy", "local:quiet"]);
}

#[test]
fn test_stale_peer_is_flagged_but_still_merged() {
    let world = TestWorld::new();
    world.write_config(&format!(
        r#"machine_id = "test-machine"
machine_name = "test-laptop"

[scan]
roots = [{root:?}]

[state]
dir = {state:?}
stale_after_days = 30
"#,
        root = world.root().display().to_string(),
        state = world.state_dir().display().to_string(),
    ));
    world.add_project("widget", r#"{"id": "widget"}"#);
    world.add_git_remote("widget", "git@github.com:acme/widget.git");

    world.write_machine_doc(
        "old-peer",
        r#"{
  "machine_id": "old-peer",
  "machine_name": "dusty",
  "last_sync": "2020-01-01T00:00:00Z",
  "repos": {
    "github.com/acme/widget": {
      "local_path": "/home/peer/widget",
      "last_opened": "2020-01-01T00:00:00Z",
      "last_pushed": null
    }
  }
}"#,
    );

    let output = world
        .command()
        .arg("list")
        .arg("--format")
        .arg("json")
        .output()
        .expect("list runs");
    assert!(output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("dusty"),
        "stale machine should be reported"
    );

    let entries: Vec<Value> = serde_json::from_slice(&output.stdout).expect("valid json");
    let widget = find(&entries, "github.com/acme/widget");
    let stale: Vec<&str> = widget["stale_sources"]
        .as_array()
        .expect("stale_sources array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(stale, vec!["dusty"]);
    // Stale data still contributes machines and activity.
    assert!(
        widget["machines"]
            .as_array()
            .expect("machines array")
            .iter()
            .any(|v| v == "dusty")
    );
}

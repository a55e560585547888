use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use chrono::Utc;
use projdeck_state::StateStore;
use projdeck_types::{ProjectRecord, RemoteIdentity};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the relay endpoints need: the rendered dashboard, the set of
/// launchable project paths, and the store for recording launch events.
pub struct RelayState {
    pub dashboard_path: PathBuf,
    /// Valid launch targets, keyed by local path. Requests for anything
    /// outside this set are rejected; the relay never launches arbitrary
    /// paths.
    pub targets: BTreeMap<PathBuf, Option<RemoteIdentity>>,
    pub store: StateStore,
    pub editor_command: Option<String>,
}

impl RelayState {
    pub fn new(
        dashboard_path: PathBuf,
        records: &[ProjectRecord],
        store: StateStore,
        editor_command: Option<String>,
    ) -> Self {
        let targets = records
            .iter()
            .map(|r| (r.local_path.clone(), r.origin.clone()))
            .collect();
        Self {
            dashboard_path,
            targets,
            store,
            editor_command,
        }
    }
}

pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/open", get(open_project))
        .with_state(state)
}

/// Generate-then-serve entry point: binds localhost only and runs until
/// the process is terminated.
pub fn serve(state: RelayState, port: u16) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let app = router(Arc::new(state));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        println!("Serving dashboard at http://localhost:{}", port);
        axum::serve(listener, app).await?;
        Ok(())
    })
}

async fn index(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    match std::fs::read_to_string(&state.dashboard_path) {
        Ok(html) => Html(html).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            "dashboard not generated yet; run `projdeck generate`",
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct OpenParams {
    path: String,
}

async fn open_project(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<OpenParams>,
) -> impl IntoResponse {
    let path = PathBuf::from(&params.path);
    let Some(identity) = state.targets.get(&path) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": "unknown project path"})),
        );
    };

    if let Err(err) = launch_editor(state.editor_command.as_deref(), &path) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": err.to_string()})),
        );
    }

    // Record the launch event for identities that merge cross-machine;
    // a failed write only loses recency, never the launch itself.
    if let Some(identity) = identity {
        let _ = state.store.mark_opened(identity, Utc::now());
    }

    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// The command line the relay runs for a launch, kept separate from the
/// spawn so it can be tested.
fn launch_invocation(editor_command: Option<&str>, path: &Path) -> (String, Vec<String>) {
    match editor_command {
        Some(cmd) => (cmd.to_string(), vec![path.display().to_string()]),
        None => {
            let url = format!("cursor://file/{}", path.display());
            #[cfg(target_os = "macos")]
            let opener = "open";
            #[cfg(not(target_os = "macos"))]
            let opener = "xdg-open";
            (opener.to_string(), vec![url])
        }
    }
}

fn launch_editor(editor_command: Option<&str>, path: &Path) -> std::io::Result<()> {
    let (program, args) = launch_invocation(editor_command, path);
    let mut child = std::process::Command::new(program)
        .args(args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;
    // Reap the opener off-thread; an unreaped child would linger as a
    // zombie for the lifetime of the serve session.
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

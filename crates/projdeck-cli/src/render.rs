use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use projdeck_types::{Presence, UnifiedEntry};
use std::fmt::Write as _;

/// Render the unified catalog to one self-contained HTML document.
///
/// Pure sink: entry order is taken as given, screenshots are inlined as
/// base64 data URIs, and nothing time- or environment-dependent is
/// embedded. Rendering unchanged input twice yields byte-identical output,
/// which is what makes regeneration idempotent end to end.
pub fn render_dashboard(entries: &[UnifiedEntry]) -> String {
    let cloned: Vec<&UnifiedEntry> = entries
        .iter()
        .filter(|e| e.presence == Presence::Cloned)
        .collect();
    let available: Vec<&UnifiedEntry> = entries
        .iter()
        .filter(|e| e.presence == Presence::Available)
        .collect();

    let mut body = String::new();
    if !cloned.is_empty() {
        section(&mut body, "Cloned", "cloned", &cloned);
    }
    if !available.is_empty() {
        section(&mut body, "Available", "available", &available);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>projdeck</title>
<style>{style}</style>
</head>
<body>
<header>
<h1>projdeck</h1>
<div class="stats">
<span class="stat">{total} projects</span>
<span class="stat">{cloned_count} cloned</span>
<span class="stat">{available_count} available</span>
</div>
<input type="text" id="search" placeholder="Search projects..." onkeyup="filterCards()">
</header>
<main>
{body}</main>
<script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        total = entries.len(),
        cloned_count = cloned.len(),
        available_count = available.len(),
        body = body,
        script = SCRIPT,
    )
}

fn section(out: &mut String, heading: &str, class: &str, entries: &[&UnifiedEntry]) {
    let _ = write!(
        out,
        "<section class=\"presence-{class}\">\n<h2>{heading} <span class=\"count\">{}</span></h2>\n<div class=\"cards\">\n",
        entries.len()
    );
    for entry in entries {
        card(out, entry);
    }
    out.push_str("</div>\n</section>\n");
}

fn card(out: &mut String, entry: &UnifiedEntry) {
    let title = escape(&entry.title);
    let one_liner = if entry.one_liner.is_empty() {
        "No description".to_string()
    } else {
        escape(&entry.one_liner)
    };

    let image = entry
        .screenshot_path
        .as_deref()
        .and_then(|p| std::fs::read(p).ok())
        .map(|bytes| {
            format!(
                "<img class=\"screenshot\" alt=\"{}\" src=\"data:image/png;base64,{}\">",
                title,
                BASE64.encode(bytes)
            )
        })
        .unwrap_or_else(|| "<div class=\"no-screenshot\">&#128193;</div>".to_string());

    let activity = entry
        .most_recent_activity
        .map(|t| {
            format!(
                "<span class=\"activity\">active {}</span>",
                t.format("%Y-%m-%d")
            )
        })
        .unwrap_or_default();

    let machines = if entry.machines.is_empty() {
        String::new()
    } else {
        format!(
            "<span class=\"machines\">{}</span>",
            escape(&entry.machines.iter().cloned().collect::<Vec<_>>().join(", "))
        )
    };

    let stale = if entry.stale_sources.is_empty() {
        String::new()
    } else {
        "<span class=\"badge stale\">stale</span>".to_string()
    };

    let tags: String = entry
        .tags
        .iter()
        .take(3)
        .map(|t| format!("<span class=\"tag\">{}</span>", escape(t)))
        .collect();

    let open_attr = entry
        .local_path
        .as_deref()
        .map(|p| {
            format!(
                " data-path=\"{}\" onclick=\"openProject(this.dataset.path)\"",
                escape(&p.to_string_lossy())
            )
        })
        .unwrap_or_default();

    let _ = write!(
        out,
        "<div class=\"card\" data-key=\"{key}\"{open_attr}>\n{image}\n<div class=\"info\">\n<h3>{title}</h3>\n<p class=\"one-liner\">{one_liner}</p>\n<div class=\"meta\">{activity}{machines}{stale}</div>\n<div class=\"tags\">{tags}</div>\n</div>\n</div>\n",
        key = escape(&entry.key),
    );
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #16213e; color: #fff; }
header { text-align: center; padding: 24px; }
header h1 { font-size: 28px; margin-bottom: 8px; }
.stats { margin-bottom: 14px; }
.stat { background: rgba(255,255,255,0.1); padding: 5px 12px; border-radius: 14px; font-size: 12px; margin: 0 4px; }
#search { width: min(480px, 90%); padding: 9px 16px; border: none; border-radius: 18px; background: rgba(255,255,255,0.1); color: #fff; outline: none; }
main { padding: 0 32px 32px; }
section h2 { font-size: 18px; margin: 18px 0 10px; }
section h2 .count { font-size: 12px; opacity: 0.6; }
.cards { display: flex; flex-wrap: wrap; gap: 14px; }
.card { width: 180px; background: rgba(255,255,255,0.08); border: 1px solid rgba(255,255,255,0.08); border-radius: 10px; overflow: hidden; cursor: pointer; }
.card:hover { background: rgba(255,255,255,0.12); }
.screenshot { width: 100%; height: 110px; object-fit: cover; display: block; }
.no-screenshot { height: 110px; display: flex; align-items: center; justify-content: center; font-size: 34px; opacity: 0.3; background: rgba(0,0,0,0.3); }
.info { padding: 10px; }
.info h3 { font-size: 13px; margin-bottom: 4px; }
.one-liner { font-size: 11px; opacity: 0.6; min-height: 28px; }
.meta { font-size: 10px; opacity: 0.7; margin-top: 6px; display: flex; gap: 6px; flex-wrap: wrap; }
.badge.stale { background: rgba(237,137,54,0.6); border-radius: 4px; padding: 1px 5px; }
.tags { margin-top: 6px; }
.tag { font-size: 9px; background: rgba(255,255,255,0.15); border-radius: 4px; padding: 1px 5px; margin-right: 3px; }
.presence-available .card { opacity: 0.7; cursor: default; }
"#;

const SCRIPT: &str = r#"
const relayMode = window.location.protocol === 'http:' && window.location.hostname === 'localhost';

function filterCards() {
  const term = document.getElementById('search').value.toLowerCase();
  document.querySelectorAll('.card').forEach(card => {
    const text = card.textContent.toLowerCase() + ' ' + (card.dataset.key || '');
    card.style.display = text.includes(term) ? '' : 'none';
  });
}

function openProject(path) {
  if (relayMode) {
    fetch('/open?path=' + encodeURIComponent(path))
      .catch(() => {});
  } else {
    const link = document.createElement('a');
    link.href = 'cursor://file/' + path;
    link.click();
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use projdeck_types::ProjectStatus;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn entry(title: &str, presence: Presence) -> UnifiedEntry {
        UnifiedEntry {
            key: format!("local:{}", title),
            identity: None,
            title: title.to_string(),
            one_liner: String::new(),
            kind: "project".to_string(),
            categories: BTreeSet::new(),
            tags: BTreeSet::new(),
            status: ProjectStatus::Unknown,
            presence,
            most_recent_activity: None,
            machines: BTreeSet::new(),
            stale_sources: BTreeSet::new(),
            local_path: Some(PathBuf::from("/code/x")),
            screenshot_path: None,
            last_modified: None,
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let entries = vec![
            entry("alpha", Presence::Cloned),
            entry("beta", Presence::Available),
        ];
        assert_eq!(render_dashboard(&entries), render_dashboard(&entries));
    }

    #[test]
    fn sections_reflect_presence() {
        let entries = vec![
            entry("alpha", Presence::Cloned),
            entry("beta", Presence::Available),
        ];
        let html = render_dashboard(&entries);
        assert!(html.contains("presence-cloned"));
        assert!(html.contains("presence-available"));
        assert!(html.contains("alpha"));
        assert!(html.contains("beta"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut e = entry("a <b> & \"c\"", Presence::Cloned);
        e.one_liner = "<script>alert(1)</script>".to_string();
        let html = render_dashboard(&[e]);
        assert!(html.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn screenshots_become_data_uris() {
        let tmp = tempfile::TempDir::new().unwrap();
        let shot = tmp.path().join("screenshot.png");
        std::fs::write(&shot, [0x89, b'P', b'N', b'G']).unwrap();

        let mut e = entry("shot", Presence::Cloned);
        e.screenshot_path = Some(shot);
        let html = render_dashboard(&[e]);
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn activity_dates_render_when_present() {
        let mut e = entry("recent", Presence::Cloned);
        e.most_recent_activity = Some(Utc.with_ymd_and_hms(2025, 4, 15, 9, 0, 0).unwrap());
        let html = render_dashboard(&[e]);
        assert!(html.contains("active 2025-04-15"));
    }
}

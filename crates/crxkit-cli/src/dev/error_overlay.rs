//! Error page served in place of artifacts while the last build is failing.
//!
//! The page listens on the live-reload channel and reloads itself once a
//! build completes.

use crate::dev::SSE_PATH;

/// Render the overlay for `error`. The message is HTML-escaped.
pub fn render_error_overlay(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Failed to compile - crxkit</title>
    <style>
        body {{
            font-family: 'Menlo', 'Monaco', 'Courier New', monospace;
            background: #1a1a1a;
            color: #e8e8e8;
            padding: 20px;
            line-height: 1.6;
        }}
        .header {{
            background: #ff4444;
            color: white;
            padding: 16px 24px;
            border-radius: 8px 8px 0 0;
            font-weight: bold;
        }}
        pre {{
            background: #2a2a2a;
            padding: 24px;
            margin: 0;
            border: 2px solid #ff4444;
            border-top: none;
            border-radius: 0 0 8px 8px;
            white-space: pre-wrap;
            word-wrap: break-word;
            color: #ff6b6b;
        }}
        .info {{
            margin-top: 16px;
            color: #888;
            font-size: 12px;
        }}
    </style>
</head>
<body>
    <div class="header">Failed to compile</div>
    <pre>{error}</pre>
    <div class="info">This page reloads once the next build succeeds.</div>
    <script>
        const source = new EventSource('{sse}');
        source.addEventListener('message', (event) => {{
            try {{
                if (JSON.parse(event.data).type === 'BuildCompleted') {{
                    location.reload();
                }}
            }} catch (e) {{}}
        }});
    </script>
</body>
</html>"#,
        error = html_escape(error),
        sse = SSE_PATH,
    )
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

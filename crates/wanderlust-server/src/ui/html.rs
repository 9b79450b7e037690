use super::state::Flash;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON for an inline `<script>`; `</` would end the script element early.
pub fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

pub fn flash(flash: Option<&Flash>) -> String {
    match flash {
        Some(Flash::Info(msg)) => format!(r#"<div class="flash info">{}</div>"#, escape(msg)),
        Some(Flash::Error(msg)) => format!(r#"<div class="flash error">{}</div>"#, escape(msg)),
        None => String::new(),
    }
}

pub fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>
    body {{ margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0e1117; color: #e6e6e6; }}
    a {{ color: #ff4b4b; }}
    h1 {{ color: #ff4b4b; }}
    .shell {{ display: flex; min-height: 100vh; }}
    .sidebar {{ width: 320px; padding: 20px; background: #161a23; }}
    .main {{ flex: 1; padding: 24px 32px; }}
    .centered {{ max-width: 420px; margin: 10vh auto; text-align: center; }}
    label {{ display: block; margin: 10px 0 4px; font-size: 14px; color: #aaa; }}
    input, select, textarea {{ width: 100%; box-sizing: border-box; padding: 8px; border-radius: 6px; border: 1px solid #333; background: #0e1117; color: #e6e6e6; }}
    button {{ width: 100%; margin-top: 14px; padding: 10px; border: none; border-radius: 20px; background: #ff4b4b; color: #fff; font-weight: 600; cursor: pointer; }}
    button.link {{ width: auto; background: none; color: #ff4b4b; padding: 0; margin: 0; }}
    .flash {{ padding: 10px 14px; border-radius: 6px; margin-bottom: 16px; }}
    .flash.info {{ background: #143d2b; }}
    .flash.error {{ background: #4d1a1a; }}
    .card {{ background: #161a23; border-radius: 10px; padding: 16px; margin-bottom: 16px; }}
    .activity {{ display: flex; gap: 12px; align-items: flex-start; padding: 8px 0; border-top: 1px solid #222; }}
    .activity.excluded {{ opacity: 0.45; }}
    .time {{ min-width: 56px; font-weight: 600; color: #ff4b4b; }}
    .muted {{ color: #888; font-size: 13px; }}
    .grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }}
    #map {{ height: 380px; border-radius: 10px; }}
    table {{ width: 100%; border-collapse: collapse; }}
    td, th {{ text-align: left; padding: 6px; border-bottom: 1px solid #222; }}
  </style>
  {head_extra}
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

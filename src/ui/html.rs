//! Standalone HTML export of a transcript.
//!
//! The page always renders in light mode, whatever the viewer's colour
//! scheme, and embeds the optional background image as a data URL so the
//! file can be opened anywhere.

use crate::core::message::Role;
use crate::core::persona::Persona;
use crate::core::transcript::Transcript;
use base64::Engine;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::warn;

pub const FALLBACK_BACKGROUND: &str = "#f0f2f6";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn image_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// CSS `background` declarations for the page body. An unreadable or absent
/// image degrades to a flat colour.
pub fn background_style(image: Option<&Path>) -> String {
    let Some(path) = image else {
        return format!("background-color: {FALLBACK_BACKGROUND};");
    };
    match fs::read(path) {
        Ok(bytes) => {
            let encoded = base64::prelude::BASE64_STANDARD.encode(bytes);
            format!(
                "background-image: linear-gradient(rgba(255,255,255,0.5), rgba(255,255,255,0.5)), \
                 url(\"data:{};base64,{encoded}\");\n      \
                 background-size: cover;\n      \
                 background-position: center;\n      \
                 background-repeat: no-repeat;\n      \
                 background-attachment: fixed;",
                image_mime(path)
            )
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "background image unreadable, using flat colour");
            format!("background-color: {FALLBACK_BACKGROUND};")
        }
    }
}

const PAGE_CSS: &str = r#"
    :root { color-scheme: light only; }
    * { box-sizing: border-box; }
    html, body { color: #000000 !important; -webkit-text-fill-color: #000000 !important; }
    body { margin: 0; font-family: "Apple SD Gothic Neo", "Malgun Gothic", "Noto Sans KR", sans-serif; }
    main { max-width: 720px; margin: 0 auto; padding: 24px 16px; }
    h1 { font-size: 1.25rem; text-align: center; }
    .turn { display: flex; flex-direction: column; margin: 12px 0; }
    .turn.user { align-items: flex-end; }
    .turn.assistant { align-items: flex-start; }
    .speaker { font-size: 0.8rem; margin: 0 6px 4px; }
    .bubble { max-width: 75%; padding: 10px 14px; border-radius: 16px; white-space: pre-wrap; word-break: break-word; background-color: #ffffff !important; border: 1px solid #d0d4dc; }
    .turn.user .bubble { background-color: #fff3c4 !important; }
"#;

/// Render the transcript as a complete HTML document.
pub fn render_html(
    transcript: &Transcript,
    persona: &Persona,
    user_name: &str,
    background: Option<&Path>,
) -> String {
    let mut body = String::new();
    for turn in transcript {
        let (class, speaker) = match turn.role {
            Role::User => ("user", user_name),
            Role::Assistant => ("assistant", persona.display_name.as_str()),
        };
        body.push_str(&format!(
            "    <div class=\"turn {class}\">\n      <div class=\"speaker\">{}</div>\n      <div class=\"bubble\">{}</div>\n    </div>\n",
            escape_html(speaker),
            escape_html(&turn.content)
        ));
    }

    let title = escape_html(&persona.display_name);
    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <meta name=\"color-scheme\" content=\"light only\">\n  \
         <title>{title}</title>\n  <style>{PAGE_CSS}    body {{\n      {}\n    }}\n  </style>\n</head>\n\
         <body>\n  <main>\n    <h1>{title}</h1>\n{body}  </main>\n</body>\n</html>\n",
        background_style(background)
    )
}

/// Write the rendered page atomically to `path`.
pub fn export_html(
    path: &Path,
    transcript: &Transcript,
    persona: &Persona,
    user_name: &str,
    background: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let html = render_html(transcript, persona, user_name, background);
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(html.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path)?;
    Ok(())
}

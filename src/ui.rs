use std::{io::Write, path::Path};

use anyhow::Result;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::types::{HistoryEntry, HistoryState};

pub struct Theme {
    pub accent: Color,
    pub border: Color,
    pub text: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    pub fn fire() -> Theme {
        Theme {
            accent: Color::Rgb { r: 255, g: 51, b: 0 },
            border: Color::Rgb { r: 255, g: 204, b: 0 },
            text: Color::Rgb { r: 255, g: 102, b: 0 },
            success: Color::Rgb { r: 255, g: 204, b: 0 },
            error: Color::Rgb { r: 255, g: 0, b: 0 },
        }
    }

    pub fn stealth() -> Theme {
        Theme {
            accent: Color::Rgb { r: 200, g: 200, b: 200 },
            border: Color::Rgb { r: 140, g: 140, b: 140 },
            text: Color::Rgb { r: 180, g: 180, b: 180 },
            success: Color::Rgb { r: 220, g: 220, b: 220 },
            error: Color::Rgb { r: 120, g: 120, b: 120 },
        }
    }

    pub fn for_mode(stealth: bool) -> Theme {
        if stealth {
            Theme::stealth()
        } else {
            Theme::fire()
        }
    }
}

fn line<W: Write>(w: &mut W, color: Color, text: &str) -> Result<()> {
    queue!(w, SetForegroundColor(color), Print(text), ResetColor, Print("\n"))?;
    Ok(())
}

pub fn draw_banner<W: Write>(w: &mut W, theme: &Theme) -> Result<()> {
    line(w, theme.border, "")?;
    line(w, theme.accent, "  ╔══════════════════════════════════════╗")?;
    line(
        w,
        theme.accent,
        &format!("  ║  tt-grab {:<28}║", format!("v{}", env!("CARGO_PKG_VERSION"))),
    )?;
    line(w, theme.accent, "  ╚══════════════════════════════════════╝")?;
    line(
        w,
        theme.text,
        "  Only download content you have the rights to.",
    )?;
    w.flush()?;

    Ok(())
}

pub fn draw_menu<W: Write>(
    w: &mut W,
    theme: &Theme,
    output_dir: &Path,
    status: &str,
    stealth: bool,
) -> Result<()> {
    line(w, theme.border, "")?;
    line(
        w,
        theme.text,
        &format!(
            "  Status: {}   Theme: {}",
            status,
            if stealth { "STEALTH" } else { "FIRE" }
        ),
    )?;
    line(w, theme.border, "  [1] Download a video")?;
    line(w, theme.border, "  [2] Download photos (slideshow)")?;
    line(w, theme.border, "  [3] Change output folder")?;
    line(w, theme.border, "  [4] Exit")?;
    line(w, theme.border, "  [5] View download history")?;
    line(w, theme.border, "  [6] Update extractor")?;
    line(w, theme.border, "  [7] Toggle stealth theme")?;
    line(
        w,
        theme.text,
        &format!("  Output folder: {}", output_dir.display()),
    )?;
    prompt(w, theme, "Please enter a command")
}

pub fn prompt<W: Write>(w: &mut W, theme: &Theme, label: &str) -> Result<()> {
    queue!(
        w,
        SetForegroundColor(theme.text),
        Print(format!("  {}: > ", label)),
        ResetColor
    )?;
    w.flush()?;

    Ok(())
}

pub fn print_info<W: Write>(w: &mut W, theme: &Theme, message: &str) -> Result<()> {
    line(w, theme.text, &format!("  {}", message))?;
    w.flush()?;
    Ok(())
}

pub fn print_success<W: Write>(w: &mut W, theme: &Theme, message: &str) -> Result<()> {
    line(w, theme.success, &format!("  [+] {}", message))?;
    w.flush()?;
    Ok(())
}

pub fn print_error<W: Write>(w: &mut W, theme: &Theme, message: &str) -> Result<()> {
    line(w, theme.error, &format!("  [!] {}", message))?;
    w.flush()?;
    Ok(())
}

pub fn draw_history<W: Write>(w: &mut W, theme: &Theme, entries: &[HistoryEntry]) -> Result<()> {
    if entries.is_empty() {
        return print_info(w, theme, "No history yet.");
    }

    line(
        w,
        theme.success,
        &format!("  Last {} downloads:", entries.len()),
    )?;

    for (i, entry) in entries.iter().enumerate() {
        let state = match entry.state {
            HistoryState::Finished => "finished",
            HistoryState::Failed => "failed",
        };

        line(
            w,
            theme.border,
            &format!(
                "  [{:02}] {} | {} | {} | {}",
                i + 1,
                entry.created_at,
                state,
                entry.mode,
                entry.quality
            ),
        )?;
        line(w, theme.text, &format!("       URL: {}", entry.url))?;

        match (&entry.output, &entry.error) {
            (Some(output), _) => line(w, theme.text, &format!("       OUT: {}", output))?,
            (None, Some(error)) => line(w, theme.error, &format!("       ERR: {}", error))?,
            (None, None) => line(w, theme.text, &format!("       DIR: {}", entry.output_dir))?,
        }
    }
    w.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::types::{HistoryEntry, HistoryState};

    use super::{draw_history, draw_menu, print_error, Theme};

    fn rendered(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn it_lists_all_choices_and_folder() {
        let mut buffer = Vec::new();
        draw_menu(&mut buffer, &Theme::fire(), Path::new("/tmp/clips"), "Ready", false).unwrap();

        let text = rendered(buffer);
        for choice in ["[1]", "[2]", "[3]", "[4]", "[5]", "[6]", "[7]"] {
            assert!(text.contains(choice), "missing {}", choice);
        }
        assert!(text.contains("Output folder: /tmp/clips"));
        assert!(text.contains("Theme: FIRE"));
    }

    #[test]
    fn it_uses_different_colors_in_stealth() {
        let mut fire = Vec::new();
        let mut stealth = Vec::new();
        print_error(&mut fire, &Theme::for_mode(false), "nope").unwrap();
        print_error(&mut stealth, &Theme::for_mode(true), "nope").unwrap();

        assert_ne!(fire, stealth);
        assert!(rendered(stealth).contains("[!] nope"));
    }

    #[test]
    fn it_renders_history_entries() {
        let entries = vec![
            HistoryEntry {
                created_at: "2024-01-02 10:00:00".to_string(),
                url: "https://a.example/2".to_string(),
                mode: "photos".to_string(),
                quality: "Best".to_string(),
                state: HistoryState::Failed,
                output: None,
                output_dir: "/tmp/clips".to_string(),
                error: Some("ERROR: private".to_string()),
            },
            HistoryEntry {
                created_at: "2024-01-01 10:00:00".to_string(),
                url: "https://a.example/1".to_string(),
                mode: "video".to_string(),
                quality: "Max 720p".to_string(),
                state: HistoryState::Finished,
                output: Some("/tmp/clips/someuser_7301.mp4".to_string()),
                output_dir: "/tmp/clips".to_string(),
                error: None,
            },
        ];

        let mut buffer = Vec::new();
        draw_history(&mut buffer, &Theme::fire(), &entries).unwrap();
        let text = rendered(buffer);

        assert!(text.contains("Last 2 downloads"));
        assert!(text.contains("[01] 2024-01-02 10:00:00 | failed | photos | Best"));
        assert!(text.contains("ERR: ERROR: private"));
        assert!(text.contains("OUT: /tmp/clips/someuser_7301.mp4"));
    }

    #[test]
    fn it_says_when_history_is_empty() {
        let mut buffer = Vec::new();
        draw_history(&mut buffer, &Theme::fire(), &[]).unwrap();

        assert!(rendered(buffer).contains("No history yet."));
    }
}

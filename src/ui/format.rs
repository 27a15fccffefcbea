use itertools::Itertools;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DONE_DOT: &str = "●";
const OPEN_DOT: &str = "○";

/// Seconds as zero-padded `mm:ss`; minutes are not wrapped into hours.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One dot per round, filled when done
pub fn round_dots(rounds: &[bool]) -> String {
    rounds
        .iter()
        .map(|&done| if done { DONE_DOT } else { OPEN_DOT })
        .join(" ")
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn percent_label(percent: f64) -> String {
    format!("{}% Complete", percent.round() as u32)
}

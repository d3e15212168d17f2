use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

use crate::output::{Line, Tone};
use crate::state::Session;

const SAFFRON: Color = Color::Rgb {
    r: 0xff,
    g: 0x99,
    b: 0x33,
};
const PHOSPHOR: Color = Color::Rgb {
    r: 0x00,
    g: 0xff,
    b: 0x00,
};

/// One screen row worth of text, split where the tone changes.
type Row = Vec<(Tone, String)>;

/// Draw a full frame: header on top, the tail of the log below it and the prompt
/// on the last row. The log is always shown scrolled to the bottom.
pub fn draw<W: Write>(out: &mut W, session: &Session, cols: u16, rows: u16) -> Result<()> {
    queue!(out, Hide, Clear(ClearType::All))?;
    let width = usize::from(cols);
    let height = usize::from(rows);
    if width == 0 || height == 0 {
        out.flush()?;
        return Ok(());
    }

    let mut header: Vec<Row> = session
        .header()
        .iter()
        .flat_map(|line| wrap(line, width))
        .collect();
    header.truncate(height - 1);
    let log_rows = height - 1 - header.len();

    let mut tail: Vec<Row> = Vec::new();
    for line in session.log().lines().rev() {
        if tail.len() >= log_rows {
            break;
        }
        let mut wrapped = wrap(line, width);
        wrapped.reverse();
        tail.extend(wrapped);
    }
    tail.truncate(log_rows);
    tail.reverse();

    for (y, row) in header.iter().chain(tail.iter()).enumerate() {
        queue!(out, MoveTo(0, y as u16))?;
        draw_row(out, row)?;
    }

    let prompt = Line::toned(session.prompt(), Tone::Prompt).with(session.input().text(), Tone::Normal);
    let caret_col = text_width(session.prompt())
        + session
            .input()
            .text()
            .chars()
            .take(session.input().caret())
            .map(char_width)
            .sum::<usize>();
    let offset = (caret_col + 1).saturating_sub(width);
    let prompt_y = rows - 1;
    queue!(out, MoveTo(0, prompt_y))?;
    draw_row(out, &clip(&prompt, offset, width))?;

    if session.is_focused() && !session.is_busy() {
        queue!(out, MoveTo((caret_col - offset) as u16, prompt_y), Show)?;
    }
    out.flush()?;
    Ok(())
}

fn draw_row<W: Write>(out: &mut W, row: &Row) -> Result<()> {
    for (tone, text) in row {
        if let Some(color) = color(*tone) {
            queue!(out, SetForegroundColor(color))?;
        }
        if *tone == Tone::Header {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(text), ResetColor, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Normal => None,
        Tone::Prompt | Tone::Success => Some(Color::Green),
        Tone::Subtitle | Tone::Keyword => Some(PHOSPHOR),
        Tone::Boot | Tone::Loading => Some(SAFFRON),
        Tone::Error => Some(Color::Red),
        Tone::Header => Some(Color::Cyan),
    }
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn push(row: &mut Row, tone: Tone, c: char) {
    match row.last_mut() {
        Some((last, text)) if *last == tone => text.push(c),
        _ => row.push((tone, c.to_string())),
    }
}

/// Break a line into rows no wider than `width`. An empty line is one empty row.
fn wrap(line: &Line, width: usize) -> Vec<Row> {
    let mut rows = vec![Row::new()];
    let mut used = 0;
    for span in line.spans() {
        for c in span.text.chars() {
            let w = char_width(c);
            if used + w > width && used > 0 {
                rows.push(Row::new());
                used = 0;
            }
            if let Some(row) = rows.last_mut() {
                push(row, span.tone, c);
            }
            used += w;
        }
    }
    rows
}

/// The part of a single-row line that is visible when scrolled `offset` columns
/// to the right.
fn clip(line: &Line, offset: usize, width: usize) -> Row {
    let mut row = Row::new();
    let mut col = 0;
    for span in line.spans() {
        for c in span.text.chars() {
            let w = char_width(c);
            if col >= offset && col + w <= offset + width {
                push(&mut row, span.tone, c);
            }
            col += w;
        }
    }
    row
}

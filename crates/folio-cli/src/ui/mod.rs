//! TUI rendering: header, scrolling page, status bar.

pub mod sections;

use folio_core::{store::KeyValueStore, theme::Theme};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Focus, Section};

// ─── Palette ──────────────────────────────────────────────────────────────────

/// Colours for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg:      Color,
  pub fg:      Color,
  pub accent:  Color,
  pub muted:   Color,
  pub bar:     Color,
  pub success: Color,
  pub error:   Color,
}

pub fn palette(theme: Theme) -> Palette {
  match theme {
    Theme::Light => Palette {
      bg:      Color::Rgb(0xF1, 0xE3, 0xE4),
      fg:      Color::Rgb(0x1F, 0x20, 0x24),
      accent:  Color::Rgb(0xA2, 0x8B, 0xA6),
      muted:   Color::Rgb(0x8A, 0x8A, 0x8C),
      bar:     Color::Rgb(0xCB, 0xCB, 0xCC),
      success: Color::Rgb(0x22, 0x8B, 0x4A),
      error:   Color::Rgb(0xC2, 0x3B, 0x3B),
    },
    Theme::Dark => Palette {
      bg:      Color::Rgb(0x1C, 0x1D, 0x21),
      fg:      Color::Rgb(0xE4, 0xE4, 0xE4),
      accent:  Color::Rgb(0xB9, 0xB9, 0xB0),
      muted:   Color::Rgb(0x5A, 0x5B, 0x60),
      bar:     Color::Rgb(0x2A, 0x2B, 0x30),
      success: Color::Rgb(0x4A, 0xDE, 0x80),
      error:   Color::Rgb(0xF8, 0x71, 0x71),
    },
  }
}

// ─── Layout ───────────────────────────────────────────────────────────────────

/// Vertical stack: header, page, status bar.
fn rows(area: Rect) -> [Rect; 3] {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // page
      Constraint::Length(1), // status bar
    ])
    .split(area);
  [rows[0], rows[1], rows[2]]
}

/// The scrolling page's area within a frame of `area`.
pub fn page_area(area: Rect) -> Rect { rows(area)[1] }

/// Line count of every section when laid out at `width`.
pub fn section_heights<S: KeyValueStore>(app: &App<S>, width: u16) -> Vec<u16> {
  Section::ALL
    .iter()
    .map(|s| u16::try_from(sections::lines(app, *s, width).len()).unwrap_or(u16::MAX))
    .collect()
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
  let [header, page, status] = rows(f.area());
  let p = palette(app.theme);

  draw_header(f, header, app, &p);
  draw_page(f, page, app, &p);
  draw_status(f, status, app, &p);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, p: &Palette) {
  let left = Span::styled(
    format!(" {}", app.document.profile.display_name()),
    Style::default().fg(p.fg).add_modifier(Modifier::BOLD),
  );

  let badge = match app.theme {
    Theme::Light => "☀ light",
    Theme::Dark => "☾ dark",
  };
  let right = Span::styled(
    if app.durable { format!("{badge} ") } else { format!("{badge} · unsaved ") },
    Style::default().fg(p.accent),
  );

  // Simple left-right header: pad the middle.
  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(p.bar)), area);
}

// ─── Page ─────────────────────────────────────────────────────────────────────

fn draw_page<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, p: &Palette) {
  let dim = Style::default().fg(p.muted).add_modifier(Modifier::DIM);

  let mut lines: Vec<Line> = Vec::new();
  for section in Section::ALL {
    let section_lines = sections::lines(app, section, area.width);
    if app.is_revealed(section) {
      lines.extend(section_lines);
    } else {
      lines.extend(section_lines.into_iter().map(|line| {
        Line::from(line.spans.into_iter().map(|s| s.style(dim)).collect::<Vec<_>>())
      }));
    }
  }

  let block = Block::default().style(Style::default().bg(p.bg).fg(p.fg));
  let para = Paragraph::new(lines).block(block).scroll((app.scroll, 0));
  f.render_widget(para, area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, p: &Palette) {
  let (mode_label, hints) = match app.focus {
    Focus::Browse => ("BROWSE", "↑↓/jk scroll  PgUp/PgDn page  t theme  c contact  q quit"),
    Focus::Contact => ("CONTACT", "Tab next field  Enter send  Esc close"),
  };

  let status = if app.status_msg.is_empty() { hints } else { app.status_msg.as_str() };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(p.bg)
      .bg(p.accent)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(p.muted));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(p.bar)), area);
}

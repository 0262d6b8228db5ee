//! Page sections rendered as pre-wrapped lines, so their heights are known
//! before drawing.

use folio_core::{
  document::{IconDisplay, TechIcon},
  store::KeyValueStore,
};
use ratatui::{
  style::{Modifier, Style},
  text::{Line, Span},
};

use super::{Palette, palette};
use crate::app::{App, Field, Focus, Section};

const INDENT: &str = "  ";

const CONTACT_INTRO: &str =
  "Have a question about a project or a potential collaboration? Send me a message!";

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Lines for `section` at a page `width`, in full colour.
pub fn lines<S: KeyValueStore>(app: &App<S>, section: Section, width: u16) -> Vec<Line<'static>> {
  let p = palette(app.theme);
  let text_width = usize::from(width).saturating_sub(2 * INDENT.len()).max(10);

  let mut out = match section {
    Section::Hero => hero(app, &p, text_width),
    Section::Technologies => technologies(app, &p),
    Section::Projects => projects(app, &p, text_width),
    Section::Contact => contact(app, &p, text_width),
  };
  out.push(Line::from(""));
  out
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn hero<S: KeyValueStore>(app: &App<S>, p: &Palette, width: usize) -> Vec<Line<'static>> {
  let profile = &app.document.profile;
  let mut out = vec![
    Line::from(""),
    Line::from(Span::styled(
      format!("{INDENT}{}", profile.display_name()),
      Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    )),
  ];

  let designation = profile.display_designation();
  if !designation.is_empty() {
    out.push(Line::from(Span::styled(
      format!("{INDENT}{designation}"),
      Style::default().fg(p.fg).add_modifier(Modifier::ITALIC),
    )));
  }

  out.push(Line::from(""));
  out.extend(paragraph(profile.display_bio(), width, Style::default().fg(p.fg)));
  out
}

fn technologies<S: KeyValueStore>(app: &App<S>, p: &Palette) -> Vec<Line<'static>> {
  let mut out = title("Technologies", p);
  for tech in &app.document.technologies {
    let glyph = match tech.icon() {
      IconDisplay::Known(icon) => icon_glyph(icon).to_owned(),
      IconDisplay::Label(label) => label,
    };
    out.push(Line::from(vec![
      Span::styled(format!("{INDENT}{glyph:<5} "), Style::default().fg(p.accent)),
      Span::styled(tech.name.clone(), Style::default().fg(p.fg)),
    ]));
  }
  out
}

fn projects<S: KeyValueStore>(app: &App<S>, p: &Palette, width: usize) -> Vec<Line<'static>> {
  let label = Style::default().fg(p.muted);
  let body = Style::default().fg(p.fg);

  let mut out = title("Projects", p);
  for (i, project) in app.document.display_projects().iter().enumerate() {
    out.push(Line::from(vec![
      Span::styled(format!("{INDENT}{:02}  ", i + 1), Style::default().fg(p.accent)),
      Span::styled(project.name.clone(), body.add_modifier(Modifier::BOLD)),
    ]));
    if !project.description.is_empty() {
      out.extend(paragraph(&project.description, width, body));
    }
    out.push(Line::from(vec![
      Span::styled(format!("{INDENT}Repository  "), label),
      Span::styled(project.repository_or_placeholder().to_owned(), Style::default().fg(p.accent)),
    ]));
    out.push(Line::from(vec![
      Span::styled(format!("{INDENT}Image       "), label),
      Span::styled(project.image_or_placeholder().to_owned(), label),
    ]));

    if !project.key_steps.is_empty() {
      out.push(Line::from(Span::styled(format!("{INDENT}Key steps"), label)));
      for (n, step) in project.key_steps.iter().enumerate() {
        let marker = format!("{}. ", n + 1);
        let hang = " ".repeat(marker.len());
        for (j, row) in wrap(step, width.saturating_sub(marker.len() + 2)).into_iter().enumerate() {
          let lead = if j == 0 { marker.as_str() } else { hang.as_str() };
          out.push(Line::from(Span::styled(format!("{INDENT}  {lead}{row}"), body)));
        }
      }
    }
    out.push(Line::from(""));
  }
  out
}

fn contact<S: KeyValueStore>(app: &App<S>, p: &Palette, width: usize) -> Vec<Line<'static>> {
  let editing = app.focus == Focus::Contact;
  let form = &app.form;

  let mut out = title("Get In Touch", p);
  out.extend(paragraph(CONTACT_INTRO, width, Style::default().fg(p.fg)));
  out.push(Line::from(""));

  if !editing && form.status.is_none() {
    out.push(Line::from(Span::styled(
      format!("{INDENT}Press c to write a message."),
      Style::default().fg(p.muted),
    )));
    return out;
  }

  for (field, label, value) in [
    (Field::Name, "Name", &form.name),
    (Field::Email, "Email", &form.email),
    (Field::Message, "Message", &form.message),
  ] {
    let focused = editing && form.field == field;
    let (marker, style) = if focused {
      ("›", Style::default().fg(p.accent).add_modifier(Modifier::BOLD))
    } else {
      (" ", Style::default().fg(p.muted))
    };
    let cursor = if focused && !form.is_sending() { "_" } else { "" };

    let rows = wrap(&format!("{value}{cursor}"), width.saturating_sub(10));
    for (i, row) in rows.into_iter().enumerate() {
      let head = if i == 0 { format!("{marker} {label:<8}") } else { " ".repeat(10) };
      out.push(Line::from(vec![
        Span::styled(head, style),
        Span::styled(row, Style::default().fg(p.fg)),
      ]));
    }
  }

  out.push(Line::from(""));
  if let Some(status) = form.status {
    let colour = if status.is_success() {
      p.success
    } else if form.is_sending() {
      p.muted
    } else {
      p.error
    };
    out.extend(paragraph(status.text(), width, Style::default().fg(colour)));
  }

  let button = if form.is_sending() { "[ Sending... ]" } else { "[ Send Message ]" };
  out.push(Line::from(Span::styled(
    format!("{INDENT}{button}"),
    Style::default().fg(p.bg).bg(p.accent).add_modifier(Modifier::BOLD),
  )));
  out
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn title(text: &str, p: &Palette) -> Vec<Line<'static>> {
  vec![
    Line::from(Span::styled(
      format!("{INDENT}{text}"),
      Style::default().fg(p.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      format!("{INDENT}{}", "─".repeat(text.chars().count())),
      Style::default().fg(p.accent),
    )),
    Line::from(""),
  ]
}

fn paragraph(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
  wrap(text, width)
    .into_iter()
    .map(|row| Line::from(Span::styled(format!("{INDENT}{row}"), style)))
    .collect()
}

/// Terminal stand-in for each technology icon.
fn icon_glyph(icon: TechIcon) -> &'static str {
  match icon {
    TechIcon::Python => "⎇",
    TechIcon::Sql => "⛁",
    TechIcon::Terminal | TechIcon::R => "</>",
    TechIcon::Ml | TechIcon::Excel => "▦",
    TechIcon::Tableau => "◐",
    TechIcon::PowerBi => "ϟ",
  }
}

/// Greedy word wrap to `width` characters. Words longer than a line are
/// split. Always returns at least one (possibly empty) line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut rows = Vec::new();
  let mut current = String::new();
  let mut current_len = 0;

  for word in text.split_whitespace() {
    let chars: Vec<char> = word.chars().collect();
    for chunk in chars.chunks(width) {
      if current_len > 0 && current_len + 1 + chunk.len() > width {
        rows.push(std::mem::take(&mut current));
        current_len = 0;
      }
      if current_len > 0 {
        current.push(' ');
        current_len += 1;
      }
      current.extend(chunk);
      current_len += chunk.len();
    }
  }

  if !current.is_empty() || rows.is_empty() {
    rows.push(current);
  }
  rows
}

//! Application state machine and event dispatcher for the viewer.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_core::{
  document::PortfolioDocument,
  message::{MessageLog, NewMessage},
  reveal::{Bounds, ElementId, IntersectionEntry, IntersectionObserver, VisibilityTrigger},
  store::{DocumentRepository, KeyValueStore, MessageLogRepository},
  theme::{Theme, ThemeStore},
  versioned::DocumentStore,
};

use crate::commands::{FAILED_MESSAGE, INCOMPLETE_MESSAGE, SENT_MESSAGE};

// ─── Sections ─────────────────────────────────────────────────────────────────

/// The page sections, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Hero,
  Technologies,
  Projects,
  Contact,
}

impl Section {
  pub const ALL: [Section; 4] = [Self::Hero, Self::Technologies, Self::Projects, Self::Contact];

  pub fn element(self) -> ElementId { ElementId(self as u32) }
}

// ─── Scroll observer ──────────────────────────────────────────────────────────

/// Intersection observation over the viewer's scroll viewport. Clones share
/// one registration set; the app feeds entries for whatever is registered
/// after every layout.
#[derive(Debug, Clone, Default)]
pub struct ScrollObserver {
  observed: Rc<RefCell<BTreeSet<ElementId>>>,
}

impl ScrollObserver {
  pub fn is_observing(&self, element: ElementId) -> bool {
    self.observed.borrow().contains(&element)
  }
}

impl IntersectionObserver for ScrollObserver {
  fn observe(&mut self, element: ElementId) { self.observed.borrow_mut().insert(element); }

  fn unobserve(&mut self, element: ElementId) { self.observed.borrow_mut().remove(&element); }
}

// ─── Contact form ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Email,
  Message,
}

impl Field {
  fn next(self) -> Self {
    match self {
      Self::Name => Self::Email,
      Self::Email => Self::Message,
      Self::Message => Self::Name,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Name => Self::Message,
      Self::Email => Self::Name,
      Self::Message => Self::Email,
    }
  }
}

/// Outcome line shown under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
  Sending,
  Sent,
  Incomplete,
  Failed,
}

impl FormStatus {
  pub fn text(self) -> &'static str {
    match self {
      Self::Sending => "Sending...",
      Self::Sent => SENT_MESSAGE,
      Self::Incomplete => INCOMPLETE_MESSAGE,
      Self::Failed => FAILED_MESSAGE,
    }
  }

  pub fn is_success(self) -> bool { self == Self::Sent }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
  pub name:    String,
  pub email:   String,
  pub message: String,
  pub field:   Field,
  pub status:  Option<FormStatus>,
}

impl Default for ContactForm {
  fn default() -> Self {
    Self {
      name:    String::new(),
      email:   String::new(),
      message: String::new(),
      field:   Field::Name,
      status:  None,
    }
  }
}

impl ContactForm {
  pub fn is_sending(&self) -> bool { self.status == Some(FormStatus::Sending) }

  fn value_mut(&mut self) -> &mut String {
    match self.field {
      Field::Name => &mut self.name,
      Field::Email => &mut self.email,
      Field::Message => &mut self.message,
    }
  }

  fn input(&self) -> NewMessage {
    NewMessage::new(self.name.clone(), self.email.clone(), self.message.clone())
  }

  fn clear_fields(&mut self) {
    self.name.clear();
    self.email.clear();
    self.message.clear();
    self.field = Field::Name;
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// Scrolling the page.
  Browse,
  /// Typing into the contact form.
  Contact,
}

/// Top-level application state.
pub struct App<S> {
  pub document: PortfolioDocument,
  pub theme:    Theme,
  pub focus:    Focus,
  pub form:     ContactForm,

  /// First visible line of the page.
  pub scroll: u16,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Whether changes reach durable storage.
  pub durable: bool,

  /// Height of each of [`Section::ALL`] at the last layout.
  heights:         Vec<u16>,
  viewport_height: u16,
  triggers:        Vec<VisibilityTrigger<ScrollObserver>>,
  observer:        ScrollObserver,
  pending_submit:  bool,

  messages: MessageLog<S>,
  themes:   ThemeStore<S>,
}

impl<S: KeyValueStore + Clone> App<S> {
  /// Load the document and theme from `backend`.
  pub async fn load(backend: S, durable: bool) -> Self {
    let document = DocumentStore::new(backend.clone()).load().await;
    let themes = ThemeStore::new(backend.clone());
    let theme = themes.load().await;

    Self {
      document,
      theme,
      focus: Focus::Browse,
      form: ContactForm::default(),
      scroll: 0,
      status_msg: if durable {
        String::new()
      } else {
        "Storage unavailable: changes will not be saved.".into()
      },
      durable,
      heights: Vec::new(),
      viewport_height: 0,
      triggers: Vec::new(),
      observer: ScrollObserver::default(),
      pending_submit: false,
      messages: MessageLog::new(backend),
      themes,
    }
  }
}

impl<S: KeyValueStore> App<S> {
  // ── Layout & reveal ───────────────────────────────────────────────────────

  /// Record the latest layout and deliver intersection entries. The first
  /// call attaches one trigger per section.
  pub fn sync_viewport(&mut self, heights: Vec<u16>, viewport_height: u16) {
    self.heights = heights;
    self.viewport_height = viewport_height;
    self.scroll = self.scroll.min(self.max_scroll());

    let vh = f64::from(viewport_height);
    let bounds = self.section_bounds();

    if self.triggers.is_empty() {
      self.triggers = Section::ALL
        .iter()
        .zip(&bounds)
        .map(|(section, b)| {
          VisibilityTrigger::attach(section.element(), Some(self.observer.clone()), *b, vh)
        })
        .collect();
      return;
    }

    for (trigger, b) in self.triggers.iter_mut().zip(&bounds) {
      if self.observer.is_observing(trigger.element()) {
        trigger.on_intersection(IntersectionEntry {
          target: trigger.element(),
          ratio:  b.intersection_ratio(vh),
        });
      }
    }
  }

  /// Section bounds relative to the top of the viewport.
  fn section_bounds(&self) -> Vec<Bounds> {
    let mut top = -f64::from(self.scroll);
    self
      .heights
      .iter()
      .map(|h| {
        let b = Bounds::new(top, f64::from(*h));
        top = b.bottom;
        b
      })
      .collect()
  }

  /// Whether `section` has been revealed. Sections are hidden until the
  /// first layout.
  pub fn is_revealed(&self, section: Section) -> bool {
    self
      .triggers
      .iter()
      .find(|t| t.element() == section.element())
      .is_some_and(VisibilityTrigger::is_revealed)
  }

  /// Page height, saturating at the largest scroll offset a frame can draw.
  fn total_height(&self) -> u16 { saturating_sum(&self.heights) }

  fn max_scroll(&self) -> u16 { self.total_height().saturating_sub(self.viewport_height) }

  fn section_top(&self, section: Section) -> u16 {
    saturating_sum(self.heights.get(..section as usize).unwrap_or(&self.heights))
  }

  fn scroll_by(&mut self, delta: i32) {
    let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
    self.scroll = u16::try_from(next).unwrap_or_default();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.focus {
      Focus::Browse => self.handle_browse_key(key).await,
      Focus::Contact => {
        self.handle_contact_key(key);
        true
      }
    }
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    let page = i32::from(self.viewport_height.saturating_sub(1).max(1));
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
      KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
      KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
      KeyCode::PageUp => self.scroll_by(-page),
      KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
      KeyCode::End | KeyCode::Char('G') => self.scroll = self.max_scroll(),

      KeyCode::Char('t') => self.toggle_theme().await,

      KeyCode::Char('c') => {
        self.focus = Focus::Contact;
        self.scroll = self.section_top(Section::Contact).min(self.max_scroll());
      }

      _ => {}
    }
    true
  }

  fn handle_contact_key(&mut self, key: KeyEvent) {
    if self.form.is_sending() {
      return;
    }
    match key.code {
      KeyCode::Esc => self.focus = Focus::Browse,
      KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
      KeyCode::BackTab | KeyCode::Up => self.form.field = self.form.field.prev(),
      KeyCode::Enter => self.request_submit(),
      KeyCode::Backspace => {
        self.form.value_mut().pop();
      }
      KeyCode::Char(c) => self.form.value_mut().push(c),
      _ => {}
    }
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  async fn toggle_theme(&mut self) {
    match self.themes.toggle(self.theme).await {
      Ok(next) => self.theme = next,
      Err(e) => {
        self.theme = self.theme.toggled();
        self.status_msg = format!("Theme not saved: {e}");
      }
    }
  }

  /// Validate the form and, if complete, move it to the sending state. The
  /// write happens in [`submit_pending`](Self::submit_pending) so a frame
  /// can show "Sending..." first.
  fn request_submit(&mut self) {
    if self.form.input().validate().is_err() {
      self.form.status = Some(FormStatus::Incomplete);
      return;
    }
    self.form.status = Some(FormStatus::Sending);
    self.pending_submit = true;
  }

  /// Perform a submission requested by the last key press, if any.
  pub async fn submit_pending(&mut self) {
    if !std::mem::take(&mut self.pending_submit) {
      return;
    }

    self.form.status = Some(match self.messages.append(self.form.input()).await {
      Ok(_) => {
        self.form.clear_fields();
        FormStatus::Sent
      }
      Err(e) if e.is_validation() => FormStatus::Incomplete,
      Err(e) => {
        tracing::error!(error = %e, "error submitting contact form");
        FormStatus::Failed
      }
    });
  }
}

fn saturating_sum(heights: &[u16]) -> u16 {
  heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h))
}

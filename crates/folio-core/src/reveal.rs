//! One-shot visibility trigger for entrance reveals.
//!
//! A [`VisibilityTrigger`] watches one element and flips its reveal signal to
//! `true` the first time the element is sufficiently on screen. The signal
//! never goes back to `false` and never fires twice.
//!
//! ```text
//!   Unobserved ──attach, observer present──▶ Observing ──ratio ≥ 0.1──▶ Revealed
//!       │                                                                 ▲
//!       └──────────────── no observer / already on screen ────────────────┘
//! ```

use tokio::sync::watch;

/// Minimum share of the element that must be inside the viewport.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Identifies an observed element within one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Vertical extent of an element relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
  pub top:    f64,
  pub bottom: f64,
}

impl Bounds {
  pub fn new(top: f64, height: f64) -> Self { Self { top, bottom: top + height } }

  pub fn height(&self) -> f64 { (self.bottom - self.top).max(0.0) }

  /// Any overlap at all with a viewport of `viewport_height`.
  pub fn overlaps(&self, viewport_height: f64) -> bool {
    self.top < viewport_height && self.bottom > 0.0
  }

  /// Share of the element inside the viewport, in `0.0..=1.0`. Zero-height
  /// elements count as fully visible when they sit inside the viewport.
  pub fn intersection_ratio(&self, viewport_height: f64) -> f64 {
    let height = self.height();
    if height == 0.0 {
      return if self.top >= 0.0 && self.top < viewport_height { 1.0 } else { 0.0 };
    }
    let visible = (self.bottom.min(viewport_height) - self.top.max(0.0)).max(0.0);
    (visible / height).clamp(0.0, 1.0)
  }
}

/// A single intersection notification delivered by the runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
  pub target: ElementId,
  pub ratio:  f64,
}

/// The runtime's intersection-observation primitive. Registration decides
/// which elements receive [`IntersectionEntry`] notifications.
pub trait IntersectionObserver {
  fn observe(&mut self, element: ElementId);
  fn unobserve(&mut self, element: ElementId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
  Unobserved,
  Observing,
  Revealed,
}

/// One-shot reveal signal for a single element.
///
/// Dropping the trigger deregisters the element if it is still being
/// observed.
pub struct VisibilityTrigger<O: IntersectionObserver> {
  element:  ElementId,
  state:    RevealState,
  observer: Option<O>,
  signal:   watch::Sender<bool>,
}

impl<O: IntersectionObserver> VisibilityTrigger<O> {
  /// Attach to `element`.
  ///
  /// With no `observer` (the runtime cannot observe intersections) the
  /// element is revealed immediately. Otherwise interest is registered, and
  /// the element is revealed straight away if `bounds` already overlap a
  /// viewport of `viewport_height`.
  pub fn attach(
    element: ElementId,
    observer: Option<O>,
    bounds: Bounds,
    viewport_height: f64,
  ) -> Self {
    let (signal, _) = watch::channel(false);
    let mut trigger = Self { element, state: RevealState::Unobserved, observer, signal };

    if let Some(observer) = trigger.observer.as_mut() {
      observer.observe(element);
      trigger.state = RevealState::Observing;
      if bounds.overlaps(viewport_height) {
        trigger.reveal();
      }
    } else {
      trigger.reveal();
    }
    trigger
  }

  pub fn element(&self) -> ElementId { self.element }

  pub fn state(&self) -> RevealState { self.state }

  pub fn is_revealed(&self) -> bool { self.state == RevealState::Revealed }

  /// A receiver for the reveal signal. Starts `false`, flips to `true` once.
  pub fn subscribe(&self) -> watch::Receiver<bool> { self.signal.subscribe() }

  /// Feed an intersection notification. Returns `true` only for the call
  /// that revealed the element.
  pub fn on_intersection(&mut self, entry: IntersectionEntry) -> bool {
    if self.state != RevealState::Observing || entry.target != self.element {
      return false;
    }
    if entry.ratio.is_nan() || entry.ratio < REVEAL_THRESHOLD {
      return false;
    }
    self.reveal();
    true
  }

  fn reveal(&mut self) {
    if self.state == RevealState::Observing
      && let Some(observer) = self.observer.as_mut()
    {
      observer.unobserve(self.element);
    }
    self.state = RevealState::Revealed;
    self.signal.send_replace(true);
    tracing::debug!(element = self.element.0, "element revealed");
  }
}

impl<O: IntersectionObserver> Drop for VisibilityTrigger<O> {
  fn drop(&mut self) {
    if self.state == RevealState::Observing
      && let Some(observer) = self.observer.as_mut()
    {
      observer.unobserve(self.element);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

  use super::*;

  /// Records registrations so tests can see what is still observed.
  #[derive(Clone, Default)]
  struct Recorder {
    observed: Rc<RefCell<BTreeSet<ElementId>>>,
    calls:    Rc<RefCell<Vec<(&'static str, ElementId)>>>,
  }

  impl IntersectionObserver for Recorder {
    fn observe(&mut self, element: ElementId) {
      self.observed.borrow_mut().insert(element);
      self.calls.borrow_mut().push(("observe", element));
    }

    fn unobserve(&mut self, element: ElementId) {
      self.observed.borrow_mut().remove(&element);
      self.calls.borrow_mut().push(("unobserve", element));
    }
  }

  const VIEWPORT: f64 = 40.0;
  const EL: ElementId = ElementId(7);

  fn offscreen() -> Bounds { Bounds::new(100.0, 20.0) }

  #[test]
  fn no_observer_reveals_immediately() {
    let trigger = VisibilityTrigger::<Recorder>::attach(EL, None, offscreen(), VIEWPORT);
    assert_eq!(trigger.state(), RevealState::Revealed);
    assert!(*trigger.subscribe().borrow());
  }

  #[test]
  fn offscreen_element_waits_for_threshold() {
    let rec = Recorder::default();
    let mut trigger = VisibilityTrigger::attach(EL, Some(rec.clone()), offscreen(), VIEWPORT);
    let rx = trigger.subscribe();

    assert_eq!(trigger.state(), RevealState::Observing);
    assert!(!*rx.borrow());
    assert!(rec.observed.borrow().contains(&EL));

    // Below threshold: nothing happens.
    assert!(!trigger.on_intersection(IntersectionEntry { target: EL, ratio: 0.05 }));
    assert!(!*rx.borrow());

    // Crossing the threshold reveals and deregisters.
    assert!(trigger.on_intersection(IntersectionEntry { target: EL, ratio: 0.1 }));
    assert!(*rx.borrow());
    assert!(rec.observed.borrow().is_empty());

    // A second event is a no-op.
    assert!(!trigger.on_intersection(IntersectionEntry { target: EL, ratio: 1.0 }));
    assert!(*rx.borrow());
    let unobserves = rec
      .calls
      .borrow()
      .iter()
      .filter(|(kind, _)| *kind == "unobserve")
      .count();
    assert_eq!(unobserves, 1);
  }

  #[test]
  fn onscreen_at_attach_reveals_synchronously() {
    let rec = Recorder::default();
    let trigger =
      VisibilityTrigger::attach(EL, Some(rec.clone()), Bounds::new(35.0, 20.0), VIEWPORT);
    assert!(trigger.is_revealed());
    assert!(rec.observed.borrow().is_empty());
  }

  #[test]
  fn nan_ratio_does_not_reveal() {
    let rec = Recorder::default();
    let mut trigger = VisibilityTrigger::attach(EL, Some(rec.clone()), offscreen(), VIEWPORT);
    assert!(!trigger.on_intersection(IntersectionEntry { target: EL, ratio: f64::NAN }));
    assert_eq!(trigger.state(), RevealState::Observing);
    assert!(rec.observed.borrow().contains(&EL));
  }

  #[test]
  fn events_for_other_elements_are_ignored() {
    let rec = Recorder::default();
    let mut trigger = VisibilityTrigger::attach(EL, Some(rec), offscreen(), VIEWPORT);
    assert!(!trigger.on_intersection(IntersectionEntry { target: ElementId(8), ratio: 1.0 }));
    assert_eq!(trigger.state(), RevealState::Observing);
  }

  #[test]
  fn drop_before_reveal_deregisters() {
    let rec = Recorder::default();
    let trigger = VisibilityTrigger::attach(EL, Some(rec.clone()), offscreen(), VIEWPORT);
    assert!(rec.observed.borrow().contains(&EL));
    drop(trigger);
    assert!(rec.observed.borrow().is_empty());
  }

  #[test]
  fn drop_after_reveal_does_not_unobserve_twice() {
    let rec = Recorder::default();
    let mut trigger = VisibilityTrigger::attach(EL, Some(rec.clone()), offscreen(), VIEWPORT);
    trigger.on_intersection(IntersectionEntry { target: EL, ratio: 0.5 });
    drop(trigger);
    assert_eq!(rec.calls.borrow().len(), 2);
  }

  #[tokio::test]
  async fn receivers_can_await_the_reveal() {
    let rec = Recorder::default();
    let mut trigger = VisibilityTrigger::attach(EL, Some(rec), offscreen(), VIEWPORT);
    let mut rx = trigger.subscribe();

    trigger.on_intersection(IntersectionEntry { target: EL, ratio: 0.3 });
    rx.wait_for(|revealed| *revealed).await.unwrap();
  }

  #[test]
  fn intersection_ratio_geometry() {
    assert_eq!(Bounds::new(0.0, 10.0).intersection_ratio(VIEWPORT), 1.0);
    assert_eq!(Bounds::new(35.0, 10.0).intersection_ratio(VIEWPORT), 0.5);
    assert_eq!(Bounds::new(-5.0, 10.0).intersection_ratio(VIEWPORT), 0.5);
    assert_eq!(Bounds::new(50.0, 10.0).intersection_ratio(VIEWPORT), 0.0);
    assert_eq!(Bounds::new(-20.0, 10.0).intersection_ratio(VIEWPORT), 0.0);
    assert!(!Bounds::new(40.0, 10.0).overlaps(VIEWPORT));
    assert!(!Bounds::new(-10.0, 10.0).overlaps(VIEWPORT));
  }
}

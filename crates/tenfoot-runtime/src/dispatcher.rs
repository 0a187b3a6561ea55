#![forbid(unsafe_code)]

//! Remote input dispatcher.
//!
//! Single entry point for remote input. Raw events are queued FIFO and
//! processed strictly one at a time:
//!
//! 1. Key presses become [`RemoteCommand`]s directly; pointer samples go
//!    through the [`GestureClassifier`]; pre-classified gestures skip it.
//! 2. Commands are routed by [`NavigationContext`]: playback goes to the
//!    [`PlaybackController`], browse/menu go to the focus engine and the
//!    navigation manager.
//! 3. Every command yields one [`CommandRecord`], success or not.
//!
//! Other threads (and select callbacks, which cannot borrow the dispatcher)
//! submit events through an [`InputSender`]; they join the same queue behind
//! anything already waiting.
//!
//! # Timers
//!
//! The dispatcher owns no threads. The host calls
//! [`RemoteInputDispatcher::tick_at`] from its event loop to fire the
//! long-press timer and the debounced scroll-into-view;
//! [`RemoteInputDispatcher::next_deadline`] sizes the poll timeout.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use tenfoot_core::config::EngineConfig;
use tenfoot_core::event::{GestureEvent, KeyKind, PlaybackNotification};
use tenfoot_core::gesture::GestureClassifier;
use tenfoot_core::{NavigationContext, RawEvent, RemoteButton, RemoteCommand};
use tenfoot_focus::FocusEngine;
use tracing::{debug, debug_span, warn};

use crate::navigation::NavigationManager;
use crate::playback::{NullPlayback, PlaybackController, PlaybackRoute};
use crate::telemetry::{CommandOutcome, CommandRecord, TelemetryLog, TelemetrySink};

/// Cloneable handle for submitting events from other threads or callbacks.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: mpsc::Sender<RawEvent>,
}

impl InputSender {
    /// Queue an event. Returns false if the dispatcher is gone.
    pub fn send(&self, event: RawEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// FIFO command processor for one screen session.
pub struct RemoteInputDispatcher {
    navigation: NavigationManager,
    classifier: GestureClassifier,
    playback: Box<dyn PlaybackController>,
    queue: VecDeque<RawEvent>,
    inbox_tx: mpsc::Sender<RawEvent>,
    inbox_rx: mpsc::Receiver<RawEvent>,
    processing: bool,
    telemetry: TelemetryLog,
    sink: Option<TelemetrySink>,
    seq: u64,
    epoch: Instant,
    /// Latest timestamp seen; used for events that carry none.
    clock: Instant,
    seek_step: Duration,
    volume_step: i32,
}

impl std::fmt::Debug for RemoteInputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteInputDispatcher")
            .field("navigation", &self.navigation)
            .field("classifier", &self.classifier)
            .field("queued", &self.queue.len())
            .field("processing", &self.processing)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl Default for RemoteInputDispatcher {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RemoteInputDispatcher {
    /// Dispatcher with a fresh engine, no playback controller, and no sink.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_navigation(config, NavigationManager::new(config))
    }

    /// Dispatcher around an existing navigation manager.
    #[must_use]
    pub fn with_navigation(config: &EngineConfig, navigation: NavigationManager) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let now = Instant::now();
        Self {
            navigation,
            classifier: GestureClassifier::new(config.gesture),
            playback: Box::new(NullPlayback),
            queue: VecDeque::new(),
            inbox_tx,
            inbox_rx,
            processing: false,
            telemetry: TelemetryLog::new(config.telemetry_capacity),
            sink: None,
            seq: 0,
            epoch: now,
            clock: now,
            seek_step: config.seek_step,
            volume_step: config.volume_step,
        }
    }

    /// Builder: attach the media player.
    #[must_use]
    pub fn with_playback(mut self, controller: impl PlaybackController + 'static) -> Self {
        self.playback = Box::new(controller);
        self
    }

    /// Builder: also write records to a JSONL sink.
    #[must_use]
    pub fn with_telemetry_sink(mut self, sink: TelemetrySink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builder: measure record timestamps from `epoch`.
    #[must_use]
    pub fn with_epoch(mut self, epoch: Instant) -> Self {
        self.epoch = epoch;
        self.clock = epoch;
        self
    }

    pub fn set_playback(&mut self, controller: Box<dyn PlaybackController>) {
        self.playback = controller;
    }

    /// Handle for submitting events from elsewhere.
    #[must_use]
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.inbox_tx.clone(),
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn navigation(&self) -> &NavigationManager {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationManager {
        &mut self.navigation
    }

    #[must_use]
    pub fn engine(&self) -> &FocusEngine {
        self.navigation.engine()
    }

    pub fn engine_mut(&mut self) -> &mut FocusEngine {
        self.navigation.engine_mut()
    }

    #[must_use]
    pub fn context(&self) -> NavigationContext {
        self.navigation.context()
    }

    #[must_use]
    pub fn telemetry(&self) -> &TelemetryLog {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut TelemetryLog {
        &mut self.telemetry
    }

    #[must_use]
    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Events waiting in the queue.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    // --- Input ---

    /// Queue an event and process everything pending, in arrival order.
    ///
    /// Returns the records of the commands completed during this call.
    pub fn handle(&mut self, event: RawEvent) -> Vec<CommandRecord> {
        self.drain_inbox();
        self.queue.push_back(event);
        self.run()
    }

    /// Process events submitted through [`InputSender`]s.
    pub fn pump(&mut self) -> Vec<CommandRecord> {
        self.drain_inbox();
        self.run()
    }

    /// Fire due timers: long-press and scroll-into-view.
    pub fn tick(&mut self) -> Vec<CommandRecord> {
        self.tick_at(Instant::now())
    }

    /// Fire due timers at `now`.
    pub fn tick_at(&mut self, now: Instant) -> Vec<CommandRecord> {
        self.observe(now);
        self.drain_inbox();
        if let Some(gesture) = self.classifier.tick_at(now) {
            self.queue.push_back(RawEvent::Gesture {
                gesture,
                timestamp: now,
            });
        }
        let records = self.run();
        self.navigation.engine_mut().tick_at(now);
        records
    }

    /// Earliest pending deadline (long press or scroll).
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let long_press = self
            .classifier
            .long_press_deadline()
            .map(|d| d.saturating_duration_since(now));
        let scroll = self.navigation.engine().time_until_scroll(now);
        match (long_press, scroll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Leave the focus-managed surface: cancel timers, drop queued input, and
    /// reset navigation. Telemetry already recorded is kept.
    pub fn reset_session(&mut self) {
        let dropped = self.queue.len() + self.inbox_rx.try_iter().count();
        debug!(dropped, "reset session");
        self.queue.clear();
        self.classifier.reset();
        self.navigation.reset();
        self.processing = false;
    }

    // --- Processing ---

    fn drain_inbox(&mut self) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.queue.push_back(event);
        }
    }

    fn run(&mut self) -> Vec<CommandRecord> {
        let mut completed = Vec::new();
        if self.processing {
            return completed;
        }
        self.processing = true;
        while let Some(event) = self.queue.pop_front() {
            if let Some(record) = self.process(event) {
                completed.push(record);
            }
            // Submitted by actions while the command ran; they go last.
            self.drain_inbox();
        }
        self.processing = false;
        completed
    }

    fn process(&mut self, event: RawEvent) -> Option<CommandRecord> {
        match event {
            RawEvent::Key(key) => {
                self.observe(key.timestamp);
                if key.kind == KeyKind::Release {
                    return None;
                }
                let command = RemoteCommand::new(key.button, self.context(), key.timestamp);
                Some(self.execute(&command))
            }
            RawEvent::Pointer(pointer) => {
                self.observe(pointer.timestamp);
                let gesture = self.classifier.on_pointer(&pointer)?;
                self.process_gesture(gesture, pointer.timestamp)
            }
            RawEvent::Gesture { gesture, timestamp } => {
                self.observe(timestamp);
                self.process_gesture(gesture, timestamp)
            }
            RawEvent::Playback(notification) => {
                self.on_playback_notification(notification);
                None
            }
        }
    }

    fn process_gesture(&mut self, gesture: GestureEvent, timestamp: Instant) -> Option<CommandRecord> {
        let Some(command) = RemoteCommand::from_gesture(gesture, self.context(), timestamp) else {
            debug!(kind = ?gesture.kind, "gesture has no remote mapping; dropped");
            return None;
        };
        Some(self.execute(&command))
    }

    fn on_playback_notification(&mut self, notification: PlaybackNotification) {
        debug!(?notification, "playback notification");
        if notification.ends_playback() && self.context() == NavigationContext::Playback {
            let now = self.clock;
            self.navigation
                .update_navigation_context_at(NavigationContext::Browse, now);
        }
    }

    fn execute(&mut self, command: &RemoteCommand) -> CommandRecord {
        let _span = debug_span!(
            "command",
            button = command.button().as_str(),
            context = command.context().as_str()
        )
        .entered();

        let outcome = if command.context().routes_to_focus() {
            self.route_focus(command)
        } else {
            self.route_playback(command)
        };

        self.seq += 1;
        let record = CommandRecord {
            seq: self.seq,
            button: command.button(),
            gesture: command.gesture().map(|g| g.kind),
            context: command.context(),
            success: outcome.is_success(),
            outcome,
            timestamp_us: micros_since(self.epoch, command.timestamp()),
        };
        debug!(seq = record.seq, outcome = outcome.as_str(), success = record.success, "command completed");

        if let Some(sink) = &self.sink
            && let Err(err) = sink.write_record(&record)
        {
            warn!(%err, "telemetry sink write failed");
        }
        self.telemetry.push(record.clone());
        record
    }

    fn route_focus(&mut self, command: &RemoteCommand) -> CommandOutcome {
        let now = command.timestamp();
        if let Some(direction) = command.direction() {
            return if self.navigation.engine_mut().move_focus_at(direction, now) {
                CommandOutcome::FocusMoved
            } else {
                CommandOutcome::NoChange
            };
        }
        match command.button() {
            RemoteButton::Select | RemoteButton::PlayPause => {
                let engine = self.navigation.engine_mut();
                let selected = if command.is_long_select() {
                    engine.long_select()
                } else {
                    engine.select()
                };
                if selected {
                    CommandOutcome::Selected
                } else {
                    CommandOutcome::NothingSelected
                }
            }
            button if button.is_back() => {
                if self.navigation.handle_back_navigation_at(now) {
                    CommandOutcome::Back
                } else {
                    CommandOutcome::BackRejected
                }
            }
            _ => CommandOutcome::Unrouted,
        }
    }

    fn route_playback(&mut self, command: &RemoteCommand) -> CommandOutcome {
        match PlaybackRoute::for_button(command.button(), self.seek_step, self.volume_step) {
            PlaybackRoute::Command(playback) => match self.playback.execute(playback) {
                Ok(()) => CommandOutcome::Playback,
                Err(err) => {
                    debug!(%err, command = %playback, "playback command rejected");
                    CommandOutcome::PlaybackRejected
                }
            },
            PlaybackRoute::LeavePlayback => {
                self.navigation
                    .update_navigation_context_at(NavigationContext::Browse, command.timestamp());
                CommandOutcome::LeftPlayback
            }
        }
    }

    fn observe(&mut self, timestamp: Instant) {
        if timestamp > self.clock {
            self.clock = timestamp;
        }
    }
}

fn micros_since(epoch: Instant, at: Instant) -> u64 {
    u64::try_from(at.saturating_duration_since(epoch).as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tenfoot_core::event::{GestureKind, KeyEvent, PointerPhase};
    use tenfoot_core::geometry::{Point, Rect};
    use tenfoot_core::{Direction, NavigationSection};
    use tenfoot_focus::{FocusId, FocusableNode};

    use crate::playback::{PlaybackCommand, PlaybackError};

    #[derive(Clone, Default)]
    struct Player(Arc<Mutex<Vec<PlaybackCommand>>>);

    impl PlaybackController for Player {
        fn execute(&mut self, command: PlaybackCommand) -> Result<(), PlaybackError> {
            self.0.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn home_row(d: &mut RemoteInputDispatcher, hits: &Arc<Mutex<Vec<String>>>) {
        for i in 0..3 {
            let sink = Arc::clone(hits);
            d.engine_mut().register(
                FocusableNode::new(format!("tile-{i}"), NavigationSection::Home)
                    .with_bounds(Rect::new(i as f32 * 120.0, 0.0, 100.0, 60.0))
                    .with_action(move |id| sink.lock().unwrap().push(id.to_string())),
            );
        }
    }

    fn focused(d: &RemoteInputDispatcher) -> Option<&str> {
        d.engine().current().map(FocusId::as_str)
    }

    #[test]
    fn key_presses_move_focus_and_record() {
        let t0 = Instant::now();
        let mut d = RemoteInputDispatcher::default().with_epoch(t0);
        let hits = Arc::default();
        home_row(&mut d, &hits);

        let records = d.handle(RawEvent::key(RemoteButton::Right, t0 + ms(5)));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, CommandOutcome::FocusMoved);
        assert_eq!(records[0].timestamp_us, 5_000);
        // First directional press recovers undefined focus.
        assert_eq!(focused(&d), Some("tile-0"));

        d.handle(RawEvent::key(RemoteButton::Right, t0 + ms(10)));
        assert_eq!(focused(&d), Some("tile-1"));
        d.handle(RawEvent::key(RemoteButton::Select, t0 + ms(20)));
        assert_eq!(*hits.lock().unwrap(), vec!["tile-1".to_string()]);
        assert_eq!(d.telemetry().len(), 3);
        assert_eq!(d.telemetry().last().map(|r| r.outcome), Some(CommandOutcome::Selected));
    }

    #[test]
    fn no_op_and_failed_commands_are_recorded() {
        let mut d = RemoteInputDispatcher::default();
        let t0 = Instant::now();
        let records = d.handle(RawEvent::key(RemoteButton::Up, t0));
        assert_eq!(records[0].outcome, CommandOutcome::NoChange);
        assert!(records[0].success);
        let records = d.handle(RawEvent::key(RemoteButton::Back, t0));
        assert_eq!(records[0].outcome, CommandOutcome::BackRejected);
        assert!(!records[0].success);
        let records = d.handle(RawEvent::key(RemoteButton::FastForward, t0));
        assert_eq!(records[0].outcome, CommandOutcome::Unrouted);
        assert_eq!(d.telemetry().len(), 3);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut d = RemoteInputDispatcher::default();
        let release = KeyEvent::press(RemoteButton::Right, Instant::now()).with_kind(KeyKind::Release);
        assert!(d.handle(RawEvent::Key(release)).is_empty());
        assert!(d.telemetry().is_empty());
    }

    #[test]
    fn playback_context_routes_to_controller() {
        let player = Player::default();
        let mut d = RemoteInputDispatcher::default().with_playback(player.clone());
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.handle(RawEvent::key(RemoteButton::Right, t0));
        let before = d.engine().current().cloned();

        d.navigation_mut()
            .update_navigation_context_at(NavigationContext::Playback, t0);
        let records = d.handle(RawEvent::key(RemoteButton::Up, t0));
        assert_eq!(records[0].outcome, CommandOutcome::Playback);
        assert_eq!(records[0].context, NavigationContext::Playback);
        d.handle(RawEvent::key(RemoteButton::Right, t0));
        d.handle(RawEvent::key(RemoteButton::Select, t0));

        assert_eq!(d.engine().current().cloned(), before);
        assert!(hits.lock().unwrap().is_empty());
        assert_eq!(
            *player.0.lock().unwrap(),
            vec![
                PlaybackCommand::VolumeChange { delta: 5 },
                PlaybackCommand::Seek { offset_ms: 10_000 },
                PlaybackCommand::TogglePlayPause,
            ]
        );

        let records = d.handle(RawEvent::key(RemoteButton::Back, t0));
        assert_eq!(records[0].outcome, CommandOutcome::LeftPlayback);
        assert_eq!(d.context(), NavigationContext::Browse);
    }

    #[test]
    fn playback_without_controller_is_rejected() {
        let mut d = RemoteInputDispatcher::default();
        let t0 = Instant::now();
        d.navigation_mut()
            .update_navigation_context_at(NavigationContext::Playback, t0);
        let records = d.handle(RawEvent::key(RemoteButton::Play, t0));
        assert_eq!(records[0].outcome, CommandOutcome::PlaybackRejected);
        assert!(!records[0].success);
    }

    #[test]
    fn playback_finished_returns_to_browse() {
        let mut d = RemoteInputDispatcher::default();
        let t0 = Instant::now();
        d.navigation_mut().push_at(NavigationSection::Player, t0);
        assert_eq!(d.context(), NavigationContext::Playback);
        let records = d.handle(RawEvent::Playback(PlaybackNotification::Paused));
        assert!(records.is_empty());
        assert_eq!(d.context(), NavigationContext::Playback);
        d.handle(RawEvent::Playback(PlaybackNotification::Finished));
        assert_eq!(d.context(), NavigationContext::Browse);
        assert!(d.telemetry().is_empty());
    }

    #[test]
    fn menu_context_moves_focus_and_back_closes_overlay() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.navigation_mut()
            .update_navigation_context_at(NavigationContext::Menu, t0);

        let records = d.handle(RawEvent::key(RemoteButton::Right, t0));
        assert_eq!(records[0].context, NavigationContext::Menu);
        assert_eq!(records[0].outcome, CommandOutcome::FocusMoved);
        assert_eq!(focused(&d), Some("tile-0"));

        let records = d.handle(RawEvent::key(RemoteButton::Menu, t0 + ms(1)));
        assert_eq!(records[0].outcome, CommandOutcome::Back);
        assert_eq!(d.context(), NavigationContext::Browse);
    }

    #[test]
    fn menu_key_pops_section() {
        let mut d = RemoteInputDispatcher::default();
        let t0 = Instant::now();
        d.navigation_mut().push_at(NavigationSection::Library, t0);
        let records = d.handle(RawEvent::key(RemoteButton::Menu, t0));
        assert_eq!(records[0].outcome, CommandOutcome::Back);
        assert_eq!(d.navigation().section(), NavigationSection::Home);
    }

    #[test]
    fn pointer_swipe_moves_focus() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.engine_mut().focus_at("tile-0", t0);

        let origin = Point::new(500.0, 300.0);
        assert!(d.handle(RawEvent::pointer(PointerPhase::Down, origin, t0)).is_empty());
        d.handle(RawEvent::pointer(PointerPhase::Move, Point::new(530.0, 302.0), t0 + ms(40)));
        let records = d.handle(RawEvent::pointer(PointerPhase::Up, Point::new(580.0, 305.0), t0 + ms(80)));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].button, RemoteButton::Right);
        assert_eq!(records[0].gesture, Some(GestureKind::Swipe));
        assert_eq!(focused(&d), Some("tile-1"));
    }

    #[test]
    fn long_press_fires_from_tick() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&hits);
        d.engine_mut().register(
            FocusableNode::new("poster", NavigationSection::Home)
                .with_action(|_| {})
                .with_long_action(move |id| sink.lock().unwrap().push(format!("long {id}"))),
        );
        let t0 = Instant::now();
        d.engine_mut().focus_at("poster", t0);

        d.handle(RawEvent::pointer(PointerPhase::Down, Point::new(10.0, 10.0), t0));
        assert!(d.tick_at(t0 + ms(499)).is_empty());
        let records = d.tick_at(t0 + ms(500));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gesture, Some(GestureKind::LongPress));
        assert_eq!(records[0].outcome, CommandOutcome::Selected);
        // Release after the long press emits nothing further.
        assert!(d
            .handle(RawEvent::pointer(PointerPhase::Up, Point::new(10.0, 10.0), t0 + ms(700)))
            .is_empty());
        assert_eq!(*hits.lock().unwrap(), vec!["long poster".to_string()]);
    }

    #[test]
    fn pinch_is_dropped_without_record() {
        let mut d = RemoteInputDispatcher::default();
        let t0 = Instant::now();
        let pinch = GestureEvent::new(GestureKind::Pinch, Point::new(0.0, 0.0), ms(120));
        assert!(d.handle(RawEvent::Gesture { gesture: pinch, timestamp: t0 }).is_empty());
        assert!(d.telemetry().is_empty());
    }

    #[test]
    fn platform_tap_selects() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.engine_mut().focus_at("tile-2", t0);
        let tap = GestureEvent::new(GestureKind::Tap, Point::new(0.0, 0.0), ms(80));
        let records = d.handle(RawEvent::Gesture { gesture: tap, timestamp: t0 });
        assert_eq!(records[0].outcome, CommandOutcome::Selected);
        assert_eq!(*hits.lock().unwrap(), vec!["tile-2".to_string()]);
    }

    #[test]
    fn queued_command_takes_context_at_dequeue() {
        let player = Player::default();
        let mut d = RemoteInputDispatcher::default().with_playback(player.clone());
        let t0 = Instant::now();
        d.navigation_mut().push_at(NavigationSection::Player, t0);
        let sender = d.sender();
        // Both arrive during playback; back leaves it before up is built.
        assert!(sender.send(RawEvent::key(RemoteButton::Back, t0)));
        assert!(sender.send(RawEvent::key(RemoteButton::Up, t0 + ms(1))));

        let records = d.pump();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].context, NavigationContext::Playback);
        assert_eq!(records[0].outcome, CommandOutcome::LeftPlayback);
        assert_eq!(records[1].context, NavigationContext::Browse);
        assert_eq!(records[1].outcome, CommandOutcome::NoChange);
        assert!(player.0.lock().unwrap().is_empty());
    }

    #[test]
    fn sender_events_queue_behind_current_command() {
        let mut d = RemoteInputDispatcher::default();
        let sender = d.sender();
        let t0 = Instant::now();
        let inner = sender.clone();
        let order = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&order);
        d.engine_mut().register(
            FocusableNode::new("a", NavigationSection::Home)
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 60.0))
                .with_action(move |_| {
                    log.lock().unwrap().push("select a");
                    inner.send(RawEvent::key(RemoteButton::Right, t0));
                }),
        );
        d.engine_mut().register(
            FocusableNode::new("b", NavigationSection::Home).with_bounds(Rect::new(120.0, 0.0, 100.0, 60.0)),
        );
        d.engine_mut().focus_at("a", t0);

        assert!(sender.send(RawEvent::key(RemoteButton::Select, t0)));
        let records = d.handle(RawEvent::key(RemoteButton::Left, t0));
        let outcomes: Vec<_> = records.iter().map(|r| r.outcome).collect();
        // Sent select first, then the handled left, then the right queued by
        // the select action.
        assert_eq!(
            outcomes,
            vec![CommandOutcome::Selected, CommandOutcome::NoChange, CommandOutcome::FocusMoved]
        );
        assert_eq!(focused(&d), Some("b"));
        let seqs: Vec<_> = records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn pump_processes_sender_events() {
        let mut d = RemoteInputDispatcher::default();
        let sender = d.sender();
        let handle = std::thread::spawn(move || sender.send(RawEvent::key(RemoteButton::Down, Instant::now())));
        assert!(handle.join().unwrap());
        let records = d.pump();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].button, RemoteButton::Down);
    }

    #[test]
    fn tick_flushes_scroll_into_view() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.handle(RawEvent::key(RemoteButton::Right, t0));
        d.handle(RawEvent::key(RemoteButton::Right, t0 + ms(30)));
        assert_eq!(d.next_deadline(t0 + ms(30)), Some(ms(100)));
        d.tick_at(t0 + ms(130));
        assert!(d.engine().pending_scroll().is_none());
        assert_eq!(d.next_deadline(t0 + ms(130)), None);
    }

    #[test]
    fn reset_session_drops_queue_and_navigation() {
        let mut d = RemoteInputDispatcher::default();
        let hits = Arc::default();
        home_row(&mut d, &hits);
        let t0 = Instant::now();
        d.navigation_mut().push_at(NavigationSection::Library, t0);
        d.handle(RawEvent::pointer(PointerPhase::Down, Point::new(0.0, 0.0), t0));
        d.sender().send(RawEvent::key(RemoteButton::Right, t0));

        d.reset_session();
        assert_eq!(d.queued(), 0);
        assert!(d.pump().is_empty());
        assert!(d.engine().graph().is_empty());
        assert_eq!(d.navigation().section(), NavigationSection::Home);
        assert!(d.tick_at(t0 + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn direction_helper_matches_buttons() {
        for dir in Direction::ALL {
            let cmd = RemoteCommand::new(RemoteButton::from_direction(dir), NavigationContext::Browse, Instant::now());
            assert_eq!(cmd.direction(), Some(dir));
        }
    }
}

//! Mock hardware adapters and a tick-driving harness for integration tests.
//!
//! Records every PWM write so tests can assert on the full command history
//! without touching real LEDC registers, and simulates button contacts and
//! the wall clock deterministically.

use growlight::app::ports::{ButtonLevels, ClockPort, EventSink, InputPort, PwmPort};
use growlight::app::service::ControllerService;
use growlight::config::{SavedState, SystemConfig};
use growlight::control::channel::ChannelId;
use growlight::error::TimeError;
use growlight::menu::Button;

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub levels: ButtonLevels,
    pub writes: Vec<(ChannelId, u8)>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written duty for a channel, if any write happened.
    #[allow(dead_code)]
    pub fn last_level(&self, id: ChannelId) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find_map(|(ch, level)| (*ch == id).then_some(*level))
    }
}

impl InputPort for MockHardware {
    fn read_buttons(&mut self) -> ButtonLevels {
        self.levels
    }
}

impl PwmPort for MockHardware {
    fn set_level(&mut self, channel: ChannelId, level: u8) {
        self.writes.push((channel, level));
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub minutes: Option<u16>,
    pub connected: bool,
    pub adjustments: Vec<i64>,
}

impl MockClock {
    pub fn unset() -> Self {
        Self {
            minutes: None,
            connected: false,
            adjustments: Vec::new(),
        }
    }

    pub fn at(minutes: u16) -> Self {
        Self {
            minutes: Some(minutes),
            connected: true,
            adjustments: Vec::new(),
        }
    }
}

impl ClockPort for MockClock {
    fn minutes_of_day(&self) -> Option<u16> {
        self.minutes
    }

    fn is_valid(&self) -> bool {
        self.connected && self.minutes.is_some()
    }

    fn adjust(&mut self, delta_secs: i64) -> Result<(), TimeError> {
        self.adjustments.push(delta_secs);
        Ok(())
    }
}

// ── MemSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemSink {
    pub events: Vec<String>,
}

impl MemSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl EventSink for MemSink {
    fn emit(&mut self, event: &growlight::app::events::AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Control-loop harness: owns the service and all mocks, and advances time
/// in config-sized ticks exactly like the firmware main loop.
pub struct Harness {
    pub app: ControllerService,
    pub hw: MockHardware,
    pub clock: MockClock,
    pub sink: MemSink,
    pub now_ms: u32,
    tick_ms: u32,
}

impl Harness {
    pub fn new(config: SystemConfig, saved: SavedState, clock: MockClock) -> Self {
        let tick_ms = config.control_loop_interval_ms;
        let mut app = ControllerService::new(config, &saved);
        let mut sink = MemSink::new();
        app.start(&mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            clock,
            sink,
            now_ms: 0,
            tick_ms,
        }
    }

    pub fn with_defaults(clock: MockClock) -> Self {
        Self::new(SystemConfig::default(), SavedState::default(), clock)
    }

    /// Run `n` control ticks with the current button levels.
    pub fn run(&mut self, n: u32) {
        for _ in 0..n {
            self.now_ms += self.tick_ms;
            self.app
                .tick(self.now_ms, &mut self.hw, &mut self.clock, &mut self.sink);
        }
    }

    /// Run ticks until `deadline_ms` (absolute) is reached.
    pub fn run_until(&mut self, deadline_ms: u32) {
        while self.now_ms < deadline_ms {
            self.run(1);
        }
    }

    fn set_button(&mut self, button: Button, pressed: bool) {
        match button {
            Button::Increment => self.hw.levels.increment = pressed,
            Button::Decrement => self.hw.levels.decrement = pressed,
        }
    }

    /// One press/release, then wait out the double-click window so the
    /// classifier resolves it to a Single.
    pub fn click(&mut self, button: Button) {
        self.set_button(button, true);
        self.run(8); // 80 ms — past the 50 ms debounce
        self.set_button(button, false);
        self.run(8);
        self.run(60); // 600 ms — past the 500 ms double-click window
    }

    /// Two quick press/release pairs; the releases land ~160 ms apart,
    /// well inside the double-click window.
    pub fn double_click(&mut self, button: Button) {
        for _ in 0..2 {
            self.set_button(button, true);
            self.run(8);
            self.set_button(button, false);
            self.run(8);
        }
        self.run(10);
    }

    /// Hold past the long-press threshold, then release.
    pub fn long_press(&mut self, button: Button) {
        self.set_button(button, true);
        self.run(120); // 1.2 s — past the 1 s threshold
        self.set_button(button, false);
        self.run(8);
    }

    pub fn targets(&self) -> [u8; 3] {
        self.app.targets()
    }
}

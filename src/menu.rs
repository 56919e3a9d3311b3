//! Menu navigation state machine.
//!
//! A closed set of top-level selections, a settings sub-menu, and a static
//! binding table mapping (selection × button × event) to an action.  The
//! navigator owns only presentation state (selection, sub-option, previewed
//! preset, language); anything that touches channels, the schedule, the
//! wall clock, or the platform is handed back to the caller as a
//! [`MenuEffect`].
//!
//! Bindings that behave identically in every view (selection cycling,
//! override clearing, the settings shortcut) live in a global fallback
//! table; everything else is bound per selection.  The lookup is a linear
//! scan over a handful of const entries — no hashing, no heap.

use serde::{Deserialize, Serialize};

use crate::control::channel::ChannelId;
use crate::drivers::button::ButtonEvent;
use crate::presets::PresetId;

// ---------------------------------------------------------------------------
// Closed enumerations
// ---------------------------------------------------------------------------

/// Top-level menu selection.  Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MenuSelection {
    AllChannels = 0,
    White = 1,
    Red = 2,
    Uv = 3,
    Presets = 4,
    Clock = 5,
    Settings = 6,
    ShowQr = 7,
    ShowHelp = 8,
}

impl MenuSelection {
    pub const COUNT: usize = 9;

    /// The channel group a brightness command in this view applies to.
    /// `None` outside the channel views.
    pub fn channel_group(self) -> Option<ChannelGroup> {
        match self {
            Self::AllChannels => Some(ChannelGroup::All),
            Self::White => Some(ChannelGroup::Single(ChannelId::White)),
            Self::Red => Some(ChannelGroup::Single(ChannelId::Red)),
            Self::Uv => Some(ChannelGroup::Single(ChannelId::Uv)),
            _ => None,
        }
    }
}

/// Which channels a brightness command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelGroup {
    All,
    Single(ChannelId),
}

/// Settings sub-menu options, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettingOption {
    Language = 0,
    PowerSave = 1,
    ShowQr = 2,
    ShowHelp = 3,
    Reboot = 4,
}

impl SettingOption {
    pub const COUNT: usize = 5;

    pub fn next(self) -> Self {
        match self {
            Self::Language => Self::PowerSave,
            Self::PowerSave => Self::ShowQr,
            Self::ShowQr => Self::ShowHelp,
            Self::ShowHelp => Self::Reboot,
            Self::Reboot => Self::Language,
        }
    }
}

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Sv,
    En,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Self::Sv => Self::En,
            Self::En => Self::Sv,
        }
    }
}

/// The two physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Increment,
    Decrement,
}

// ---------------------------------------------------------------------------
// Navigator state and effects
// ---------------------------------------------------------------------------

/// Presentation state consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub selection: MenuSelection,
    pub setting_option: SettingOption,
    /// Previewed (not yet applied) preset in the Presets view.
    pub viewing_preset: PresetId,
    pub language: Language,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            selection: MenuSelection::AllChannels,
            setting_option: SettingOption::Language,
            viewing_preset: PresetId::Seed,
            language: Language::Sv,
        }
    }
}

/// Cross-component commands produced by a button event; the navigator has
/// already applied any pure-navigation part of the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    /// Change the selected channel group's brightness by this delta.
    Adjust(i16),
    /// Turn the selected channel group fully off.
    TurnOff,
    /// Apply a catalog preset to all channels.
    ApplyPreset(PresetId),
    /// Move the wall clock by this many seconds.
    AdjustClock(i64),
    /// Drop the manual override and reapply the schedule now.
    ClearOverride,
    /// Flip the power-save mode.
    TogglePowerSave,
    /// The user asked for a device reboot.
    RebootRequested,
}

// ---------------------------------------------------------------------------
// Binding table
// ---------------------------------------------------------------------------

/// What a (selection, button, event) combination means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    AdjustUp,
    AdjustDown,
    TurnOffGroup,
    NextPreset,
    ApplyViewedPreset,
    NextSetting,
    ActivateSetting,
    ClockCoarseAdd,
    ClockFineAdd,
    BackToSettings,
    CycleSelection,
    ClearOverride,
    GotoSettingsHome,
    Nothing,
}

struct Binding {
    selection: MenuSelection,
    button: Button,
    event: ButtonEvent,
    action: MenuAction,
}

const fn bind(
    selection: MenuSelection,
    button: Button,
    event: ButtonEvent,
    action: MenuAction,
) -> Binding {
    Binding {
        selection,
        button,
        event,
        action,
    }
}

use Button::{Decrement, Increment};
use ButtonEvent::{Double, Long, Single};
use MenuAction::*;
use MenuSelection::*;

/// Per-selection bindings.  Looked up before the global table.
static BINDINGS: &[Binding] = &[
    // Channel views: single steps brightness, decrement-double kills the
    // group.
    bind(AllChannels, Increment, Single, AdjustUp),
    bind(AllChannels, Decrement, Single, AdjustDown),
    bind(AllChannels, Decrement, Double, TurnOffGroup),
    bind(White, Increment, Single, AdjustUp),
    bind(White, Decrement, Single, AdjustDown),
    bind(White, Decrement, Double, TurnOffGroup),
    bind(Red, Increment, Single, AdjustUp),
    bind(Red, Decrement, Single, AdjustDown),
    bind(Red, Decrement, Double, TurnOffGroup),
    bind(Uv, Increment, Single, AdjustUp),
    bind(Uv, Decrement, Single, AdjustDown),
    bind(Uv, Decrement, Double, TurnOffGroup),
    // Presets: preview with increment, commit with decrement.
    bind(Presets, Increment, Single, NextPreset),
    bind(Presets, Decrement, Single, ApplyViewedPreset),
    // Clock: coarse/fine time nudges while unsynced.
    bind(Clock, Increment, Single, ClockCoarseAdd),
    bind(Clock, Decrement, Single, ClockFineAdd),
    // Settings: cycle options, activate the highlighted one.
    bind(Settings, Increment, Single, NextSetting),
    bind(Settings, Decrement, Single, ActivateSetting),
    // Informational views: any single press returns to Settings.
    bind(ShowQr, Increment, Single, BackToSettings),
    bind(ShowQr, Decrement, Single, BackToSettings),
    bind(ShowHelp, Increment, Single, BackToSettings),
    bind(ShowHelp, Decrement, Single, BackToSettings),
];

/// Bindings that apply in every view.
static GLOBAL_BINDINGS: &[(Button, ButtonEvent, MenuAction)] = &[
    (Increment, Double, CycleSelection),
    (Increment, Long, ClearOverride),
    (Decrement, Long, GotoSettingsHome),
];

fn action_for(selection: MenuSelection, button: Button, event: ButtonEvent) -> MenuAction {
    if let Some(b) = BINDINGS
        .iter()
        .find(|b| b.selection == selection && b.button == button && b.event == event)
    {
        return b.action;
    }
    GLOBAL_BINDINGS
        .iter()
        .find(|(btn, ev, _)| *btn == button && *ev == event)
        .map_or(Nothing, |(_, _, action)| *action)
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

pub struct MenuNavigator {
    state: MenuState,
    brightness_step: i16,
    clock_coarse_secs: i64,
    clock_fine_secs: i64,
}

impl MenuNavigator {
    pub fn new(brightness_step: i16, clock_coarse_secs: i64, clock_fine_secs: i64) -> Self {
        Self {
            state: MenuState::default(),
            brightness_step,
            clock_coarse_secs,
            clock_fine_secs,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn selection(&self) -> MenuSelection {
        self.state.selection
    }

    pub fn language(&self) -> Language {
        self.state.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
    }

    /// Hot-reload the step sizes after a config update; navigation state is
    /// left untouched.
    pub fn set_steps(&mut self, brightness_step: i16, clock_coarse_secs: i64, clock_fine_secs: i64) {
        self.brightness_step = brightness_step;
        self.clock_coarse_secs = clock_coarse_secs;
        self.clock_fine_secs = clock_fine_secs;
    }

    /// Process one classified button event.
    ///
    /// `clock_offered` gates whether the Clock view appears in the cycling
    /// order; pass the time/connectivity-invalid query result.
    pub fn handle(
        &mut self,
        button: Button,
        event: ButtonEvent,
        clock_offered: bool,
    ) -> Option<MenuEffect> {
        match action_for(self.state.selection, button, event) {
            AdjustUp => Some(MenuEffect::Adjust(self.brightness_step)),
            AdjustDown => Some(MenuEffect::Adjust(-self.brightness_step)),
            TurnOffGroup => Some(MenuEffect::TurnOff),
            NextPreset => {
                self.state.viewing_preset = self.state.viewing_preset.next();
                None
            }
            ApplyViewedPreset => Some(MenuEffect::ApplyPreset(self.state.viewing_preset)),
            NextSetting => {
                self.state.setting_option = self.state.setting_option.next();
                None
            }
            ActivateSetting => self.activate_setting(),
            ClockCoarseAdd => Some(MenuEffect::AdjustClock(self.clock_coarse_secs)),
            ClockFineAdd => Some(MenuEffect::AdjustClock(self.clock_fine_secs)),
            BackToSettings => {
                self.state.selection = MenuSelection::Settings;
                None
            }
            CycleSelection => {
                self.cycle_selection(clock_offered);
                None
            }
            ClearOverride => Some(MenuEffect::ClearOverride),
            GotoSettingsHome => {
                self.state.selection = MenuSelection::Settings;
                self.state.setting_option = SettingOption::Language;
                None
            }
            Nothing => None,
        }
    }

    fn activate_setting(&mut self) -> Option<MenuEffect> {
        match self.state.setting_option {
            SettingOption::Language => {
                self.state.language = self.state.language.toggle();
                None
            }
            SettingOption::PowerSave => Some(MenuEffect::TogglePowerSave),
            SettingOption::ShowQr => {
                self.state.selection = MenuSelection::ShowQr;
                None
            }
            SettingOption::ShowHelp => {
                self.state.selection = MenuSelection::ShowHelp;
                None
            }
            SettingOption::Reboot => Some(MenuEffect::RebootRequested),
        }
    }

    /// Advance the top-level selection.  The Clock view is only part of the
    /// loop while the wall clock still needs manual attention.
    fn cycle_selection(&mut self, clock_offered: bool) {
        self.state.selection = match self.state.selection {
            AllChannels => White,
            White => Red,
            Red => Uv,
            Uv => Presets,
            Presets => {
                if clock_offered {
                    Clock
                } else {
                    Settings
                }
            }
            Clock => {
                self.state.setting_option = SettingOption::Language;
                Settings
            }
            Settings | ShowQr | ShowHelp => AllChannels,
        };
    }
}

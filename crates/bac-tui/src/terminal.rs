// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal setup and restore.
//!
//! Every mode change is recorded so [`cleanup_terminal`] undoes exactly what
//! [`setup_terminal`] did, once, whether it runs on the normal exit path or
//! from the panic hook.

use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;

static CLEANUP_DONE: AtomicBool = AtomicBool::new(false);
static RAW_MODE_ENABLED: AtomicBool = AtomicBool::new(false);
static ALTERNATE_SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);
static KB_FLAGS_PUSHED: AtomicBool = AtomicBool::new(false);
static MOUSE_CAPTURE_ENABLED: AtomicBool = AtomicBool::new(false);
static FOCUS_CHANGE_ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub raw_mode: bool,
    pub alternate_screen: bool,
    /// Ask for key release reports and unambiguous escapes, where supported.
    pub keyboard_enhancement: bool,
    /// Hover and click on suggestions.
    pub mouse_capture: bool,
    /// Report the terminal window gaining and losing focus.
    pub focus_change: bool,
    /// Restore the terminal before the default panic output.
    pub panic_hook: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            raw_mode: true,
            alternate_screen: true,
            keyboard_enhancement: true,
            mouse_capture: true,
            focus_change: true,
            panic_hook: true,
        }
    }
}

pub fn setup_terminal(config: &TerminalConfig) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    CLEANUP_DONE.store(false, Ordering::SeqCst);

    if config.raw_mode {
        crossterm::terminal::enable_raw_mode()?;
        RAW_MODE_ENABLED.store(true, Ordering::SeqCst);
    }

    if config.alternate_screen {
        stdout.execute(EnterAlternateScreen)?;
        ALTERNATE_SCREEN_ACTIVE.store(true, Ordering::SeqCst);
    }

    if config.keyboard_enhancement && crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false) {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
        KB_FLAGS_PUSHED.store(true, Ordering::SeqCst);
    }

    if config.mouse_capture {
        stdout.execute(EnableMouseCapture)?;
        MOUSE_CAPTURE_ENABLED.store(true, Ordering::SeqCst);
    }

    if config.focus_change {
        stdout.execute(EnableFocusChange)?;
        FOCUS_CHANGE_ENABLED.store(true, Ordering::SeqCst);
    }

    if config.panic_hook {
        let default_panic = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            cleanup_terminal();
            default_panic(panic_info);
        }));
    }

    Ok(())
}

pub fn cleanup_terminal() {
    if CLEANUP_DONE.swap(true, Ordering::SeqCst) {
        return;
    }

    let mut stdout = io::stdout();

    // Keyboard flags must be popped while still on the alternate screen.
    if KB_FLAGS_PUSHED.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(PopKeyboardEnhancementFlags);
    }
    if MOUSE_CAPTURE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(DisableMouseCapture);
    }
    if FOCUS_CHANGE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(DisableFocusChange);
    }
    if RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
    if ALTERNATE_SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

//! Terminal logging with colored module prefixes and progress bars.
//!
//! - `log!` prints one line prefixed with `[module]`
//! - `ProgressBars` tracks pre-rendering of many pages at once
//!
//! # Example
//!
//! ```ignore
//! log!("serve"; "GET {} -> {}", path, status);
//!
//! let progress = ProgressBars::new(&[("categories", slugs.len())]);
//! progress.inc(0);
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Layout Constants
// ============================================================================
//
// Progress bar format: "[module] [████░░░░] 42/100"

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;
/// Bar wrapper: " []"
const BAR_WRAPPER_LEN: usize = 3;
/// Space before count
const SPACE_BEFORE_COUNT: usize = 1;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Terminal width, cached. Falls back to 120 columns when not a tty.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Write a prefixed line, truncated to the terminal width unless multiline.
#[allow(clippy::cast_possible_truncation)] // bar count is always small
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();
    let bar_count = BAR_COUNT.load(Ordering::SeqCst);

    // Draw above the progress area, then restore it
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, width.saturating_sub(calc_prefix_len(module.len())))
    };
    writeln!(stdout, "{prefix} {message}").ok();

    for _ in 0..bar_count {
        writeln!(stdout).ok();
    }
    stdout.flush().ok();
}

/// Color a module prefix by module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold(),
        "cms" => prefix.bright_magenta().bold(),
        "cache" => prefix.bright_cyan().bold(),
        "build" | "sitemap" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate to at most `max_len` bytes on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress Bars
// ============================================================================

/// Multiple progress bars, one terminal line each, indexed by creation order.
///
/// Terminal writes are serialized by an internal mutex so bars may be
/// advanced from tokio tasks on different worker threads.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    /// Reserve one line per `(module, total)` entry.
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in 0..modules.len() {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        BAR_COUNT.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .enumerate()
            .map(|(row, (module, total))| ProgressBar {
                prefix: colorize_prefix(module, &module.to_ascii_lowercase()),
                prefix_len: calc_prefix_len(module.len()),
                total: *total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Like `new`, but skips empty entries and returns `None` when fewer
    /// than two items would be tracked.
    pub fn new_filtered(modules: &[(&'static str, usize)]) -> Option<Self> {
        let filtered: Vec<_> = modules
            .iter()
            .filter(|(_, count)| *count > 0)
            .copied()
            .collect();
        let total: usize = filtered.iter().map(|(_, c)| c).sum();

        (total > 1).then(|| Self::new(&filtered))
    }

    /// Advance bar `index` by one.
    pub fn inc(&self, index: usize) {
        if let Some(bar) = self.bars.get(index) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let progress_text = format!("{}/{}", current, bar.total);
        let bar_width = bar_width(
            get_terminal_width() as usize,
            bar.prefix_len + progress_text.len(),
        );
        let filled = filled_cells(current, bar.total, bar_width);
        let progress_bar = "█".repeat(filled) + &"░".repeat(bar_width - filled);

        let mut stdout = stdout().lock();
        #[allow(clippy::cast_possible_truncation)] // bar count is always small
        let lines_up = (self.bars.len() - bar.row) as u16;

        execute!(stdout, cursor::MoveUp(lines_up)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", bar.prefix, progress_bar, progress_text).ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear all progress bars from the terminal.
    #[allow(clippy::cast_possible_truncation)] // bar count is always small
    pub fn finish(&self) {
        if BAR_COUNT.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();
        let mut stdout = stdout().lock();
        let bars_len = self.bars.len() as u16;

        execute!(stdout, cursor::MoveUp(bars_len)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Width of the bar itself given the terminal width and the fixed text around it.
fn bar_width(terminal_width: usize, text_len: usize) -> usize {
    let overhead = text_len + BAR_WRAPPER_LEN + SPACE_BEFORE_COUNT;
    terminal_width
        .saturating_sub(overhead)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

fn filled_cells(current: usize, total: usize, width: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (current.min(total) * width) / total
}

// ============================================================================
// Tests
// ============================================================================

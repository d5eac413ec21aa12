//! Application state and key handling for the dashboard.

use crate::watchlist::FileWatchlist;
use crossterm::event::{KeyCode, KeyEvent};
use surge_core::{ScannerState, SortKey, WatchlistStore};

/// Input focus of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Keystrokes edit the free-text query.
    Query,
}

/// Everything the render pass needs, plus the key handling that mutates
/// it. All mutation funnels through [`App::refresh`] so the projection
/// is always re-derived before the next draw.
pub struct App {
    pub state: ScannerState,
    pub watchlist: FileWatchlist,
    pub mode: Mode,
    /// Cursor into the filtered projection.
    pub selected: usize,
    /// User-visible status notice, e.g. a failed snapshot fetch.
    pub notice: Option<String>,
    pub reload_requested: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(watchlist: FileWatchlist) -> Self {
        Self {
            state: ScannerState::new(),
            watchlist,
            mode: Mode::default(),
            selected: 0,
            notice: None,
            reload_requested: false,
            should_quit: false,
        }
    }

    /// Re-derive the projection and clamp the cursor to it.
    pub fn refresh(&mut self) {
        self.state.apply_filters(&self.watchlist);
        if self.state.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.state.filtered.len() {
            self.selected = self.state.filtered.len() - 1;
        }
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.state
            .filtered
            .get(self.selected)
            .map(|r| r.symbol.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Query => self.handle_query_key(key.code),
            Mode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                self.state.filters.query.pop();
                self.refresh();
            }
            KeyCode::Char(c) => {
                self.state.filters.query.push(c);
                self.refresh();
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.mode = Mode::Query,
            KeyCode::Char('r') => self.reload_requested = true,

            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.state.filtered.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(symbol) = self.selected_symbol().map(str::to_string) {
                    self.state.toggle_expanded(&symbol);
                }
            }

            KeyCode::Char('s') => {
                let next = next_sort_key(self.state.sort_key, 1);
                self.state.select_sort(next);
                self.refresh();
            }
            KeyCode::Char('S') => {
                let next = next_sort_key(self.state.sort_key, -1);
                self.state.select_sort(next);
                self.refresh();
            }
            KeyCode::Char('d') => {
                self.state.sort_dir = self.state.sort_dir.flip();
                self.refresh();
            }

            KeyCode::Char('c') => {
                self.state.filters.sector =
                    cycle_option(self.state.sectors(), self.state.filters.sector.take());
                self.refresh();
            }
            KeyCode::Char('a') => {
                self.state.filters.alert_code =
                    cycle_option(self.state.alert_codes(), self.state.filters.alert_code.take());
                self.refresh();
            }
            KeyCode::Char('w') => {
                self.state.filters.watchlist_only = !self.state.filters.watchlist_only;
                self.refresh();
            }
            KeyCode::Char('m') => {
                if let Some(symbol) = self.selected_symbol().map(str::to_string) {
                    self.watchlist.toggle(&symbol);
                    self.refresh();
                }
            }

            // Indicator windows; all bounded below so indicators keep a
            // meaningful lookback.
            KeyCode::Char('[') => self.adjust_windows(|w| w.rsi = w.rsi.saturating_sub(1).max(2)),
            KeyCode::Char(']') => self.adjust_windows(|w| w.rsi += 1),
            KeyCode::Char('{') => {
                self.adjust_windows(|w| w.sharpe = w.sharpe.saturating_sub(10).max(2))
            }
            KeyCode::Char('}') => self.adjust_windows(|w| w.sharpe += 10),
            KeyCode::Char('-') => self.adjust_windows(|w| w.iv = w.iv.saturating_sub(10).max(2)),
            KeyCode::Char('=') => self.adjust_windows(|w| w.iv += 10),

            _ => {}
        }
    }

    fn adjust_windows(&mut self, f: impl FnOnce(&mut surge_core::WindowConfig)) {
        f(&mut self.state.windows);
        // Window changes invalidate every derived field; a full
        // re-enrichment pass runs inside refresh.
        self.refresh();
    }
}

fn next_sort_key(current: SortKey, step: isize) -> SortKey {
    let keys = SortKey::ALL;
    let idx = keys.iter().position(|k| *k == current).unwrap_or(0) as isize;
    let next = (idx + step).rem_euclid(keys.len() as isize) as usize;
    keys[next]
}

// None -> first option -> ... -> last option -> None
fn cycle_option(options: Vec<String>, current: Option<String>) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    match current {
        None => Some(options[0].clone()),
        Some(value) => match options.iter().position(|o| *o == value) {
            Some(idx) if idx + 1 < options.len() => Some(options[idx + 1].clone()),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_sort_key_wraps() {
        assert_eq!(next_sort_key(SortKey::Symbol, 1), SortKey::Name);
        assert_eq!(next_sort_key(SortKey::Alerts, 1), SortKey::Symbol);
        assert_eq!(next_sort_key(SortKey::Symbol, -1), SortKey::Alerts);
    }

    #[test]
    fn test_cycle_option() {
        let options = vec!["Energy".to_string(), "Tech".to_string()];
        assert_eq!(
            cycle_option(options.clone(), None),
            Some("Energy".to_string())
        );
        assert_eq!(
            cycle_option(options.clone(), Some("Energy".to_string())),
            Some("Tech".to_string())
        );
        assert_eq!(cycle_option(options.clone(), Some("Tech".to_string())), None);
        // A stale selection no longer in the list resets the filter.
        assert_eq!(cycle_option(options, Some("Gone".to_string())), None);
        assert_eq!(cycle_option(Vec::new(), None), None);
    }
}

//! Single-focus chart detail view. At most one symbol is focused at a time;
//! selecting another symbol replaces the focus outright (no history stack).
//! Each focus/timeframe change carries its own fetch sequence so a slow
//! indicator response for a superseded fetch can never overwrite the current
//! focus.

use crate::wire::ChartIndicators;

pub const DEFAULT_TIMEFRAME: &str = "1h";

/// Opaque rendering collaborator. It receives the symbol and nothing else,
/// and produces no semantic feedback into this core.
pub trait ChartHost: Send + Sync {
    fn show(&self, symbol: &str);
    fn clear(&self);
}

/// Host that only announces render requests on stdout. Stands in wherever no
/// real chart widget is embedded.
pub struct PrintChartHost;

impl ChartHost for PrintChartHost {
    fn show(&self, symbol: &str) {
        println!("[chart] render {symbol}");
    }

    fn clear(&self) {
        println!("[chart] cleared");
    }
}

/// Draggable manual-trade overlay. Offsets are viewport-relative; a drag is
/// a pure position delta between press and release.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub x: f64,
    pub y: f64,
    drag: Option<DragGesture>,
}

#[derive(Debug, Clone)]
struct DragGesture {
    press_x: f64,
    press_y: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Overlay {
    /// Pointer press on the overlay. A press that lands on an interactive
    /// child (a button) must still deliver its click, so it never starts a
    /// drag gesture.
    pub fn press(&mut self, x: f64, y: f64, on_interactive_child: bool) {
        if on_interactive_child {
            self.drag = None;
            return;
        }
        self.drag = Some(DragGesture {
            press_x: x,
            press_y: y,
            origin_x: self.x,
            origin_y: self.y,
        });
    }

    /// Pointer move while pressed. Returns true when the offset changed.
    /// `max_x`/`max_y` bound the overlay inside the viewport.
    pub fn drag_move(&mut self, x: f64, y: f64, max_x: f64, max_y: f64) -> bool {
        let Some(g) = self.drag.as_ref() else {
            return false;
        };
        let nx = (g.origin_x + (x - g.press_x)).clamp(0.0, max_x.max(0.0));
        let ny = (g.origin_y + (y - g.press_y)).clamp(0.0, max_y.max(0.0));
        if nx == self.x && ny == self.y {
            return false;
        }
        self.x = nx;
        self.y = ny;
        true
    }

    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FocusState {
    pub symbol: String,
    pub timeframe: String,
    pub indicators: Option<ChartIndicators>,
    pub overlay: Overlay,
    fetch_seq: u64,
}

#[derive(Debug, Clone, Default)]
pub enum ChartSession {
    #[default]
    Closed,
    Focused(FocusState),
}

impl ChartSession {
    pub fn new() -> Self {
        ChartSession::Closed
    }

    /// Focuses `symbol` with the default timeframe, replacing any previous
    /// focus. `fetch_seq` tags the indicator fetch this transition issues.
    pub fn select(&mut self, symbol: &str, fetch_seq: u64) {
        *self = ChartSession::Focused(FocusState {
            symbol: symbol.to_string(),
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            indicators: None,
            overlay: Overlay::default(),
            fetch_seq,
        });
    }

    /// Changes the timeframe of the current focus, invalidating the previous
    /// fetch. No-op when closed; returns the symbol to refetch for.
    pub fn set_timeframe(&mut self, timeframe: &str, fetch_seq: u64) -> Option<String> {
        match self {
            ChartSession::Focused(f) => {
                f.timeframe = timeframe.to_string();
                f.indicators = None;
                f.fetch_seq = fetch_seq;
                Some(f.symbol.clone())
            }
            ChartSession::Closed => None,
        }
    }

    pub fn close(&mut self) {
        *self = ChartSession::Closed;
    }

    pub fn focused(&self) -> Option<&FocusState> {
        match self {
            ChartSession::Focused(f) => Some(f),
            ChartSession::Closed => None,
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut FocusState> {
        match self {
            ChartSession::Focused(f) => Some(f),
            ChartSession::Closed => None,
        }
    }

    pub fn focused_symbol(&self) -> Option<&str> {
        self.focused().map(|f| f.symbol.as_str())
    }

    /// Accepts an indicator response only if it belongs to the live fetch.
    /// Late responses from a superseded focus or timeframe are dropped.
    pub fn apply_indicators(&mut self, fetch_seq: u64, data: ChartIndicators) -> bool {
        match self {
            ChartSession::Focused(f) if f.fetch_seq == fetch_seq => {
                f.indicators = Some(data);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(rsi: f64) -> ChartIndicators {
        ChartIndicators {
            rsi: Some(rsi),
            high_24h: 110.0,
            low_24h: 90.0,
            dip_percent: 2.0,
        }
    }

    #[test]
    fn select_replaces_focus_without_history() {
        let mut chart = ChartSession::new();
        chart.select("ETH/USDT", 1);
        chart.select("SOL/USDT", 2);
        assert_eq!(chart.focused_symbol(), Some("SOL/USDT"));
        chart.close();
        assert!(chart.focused_symbol().is_none());
    }

    #[test]
    fn late_response_for_old_focus_is_dropped() {
        let mut chart = ChartSession::new();
        chart.select("ETH/USDT", 1);
        chart.select("SOL/USDT", 2);

        // ETH response arrives after the refocus.
        assert!(!chart.apply_indicators(1, indicators(40.0)));
        assert!(chart.focused().unwrap().indicators.is_none());

        assert!(chart.apply_indicators(2, indicators(55.0)));
        assert_eq!(
            chart.focused().unwrap().indicators.as_ref().unwrap().rsi,
            Some(55.0)
        );
    }

    #[test]
    fn timeframe_change_invalidates_previous_fetch() {
        let mut chart = ChartSession::new();
        chart.select("BTC/USDT", 1);
        let refetch = chart.set_timeframe("4h", 2);
        assert_eq!(refetch.as_deref(), Some("BTC/USDT"));
        assert!(!chart.apply_indicators(1, indicators(33.0)));
        assert!(chart.apply_indicators(2, indicators(33.0)));
    }

    #[test]
    fn drag_is_a_pure_offset_delta() {
        let mut ov = Overlay::default();
        ov.press(100.0, 100.0, false);
        assert!(ov.drag_move(130.0, 110.0, 500.0, 500.0));
        assert_eq!((ov.x, ov.y), (30.0, 10.0));
        ov.release();

        // Second gesture continues from the released position.
        ov.press(50.0, 50.0, false);
        assert!(ov.drag_move(60.0, 45.0, 500.0, 500.0));
        assert_eq!((ov.x, ov.y), (40.0, 5.0));
    }

    #[test]
    fn press_on_child_button_cancels_drag_start() {
        let mut ov = Overlay::default();
        ov.press(10.0, 10.0, true);
        assert!(!ov.dragging());
        assert!(!ov.drag_move(90.0, 90.0, 500.0, 500.0));
        assert_eq!((ov.x, ov.y), (0.0, 0.0));
    }

    #[test]
    fn drag_clamps_to_viewport() {
        let mut ov = Overlay::default();
        ov.press(0.0, 0.0, false);
        ov.drag_move(1000.0, -50.0, 300.0, 200.0);
        assert_eq!((ov.x, ov.y), (300.0, 0.0));
    }
}

//! Stopwatch with laps. Time is derived from caller-supplied timestamps
//! (milliseconds) so a throttled background tab never loses ticks.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::WidgetError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    /// 1-based lap number.
    pub number: u32,
    /// Total elapsed time when the lap was recorded.
    pub time: f64,
    pub lap_time: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LapView {
    pub number: u32,
    pub time: String,
    pub lap_time: String,
    pub fastest: bool,
    pub slowest: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub elapsed_ms: f64,
    pub display: String,
    pub running: bool,
    pub laps: Vec<LapView>,
}

#[derive(Debug, Default, Clone)]
pub struct StopwatchState {
    accumulated: f64,
    started_at: Option<f64>,
    lap_start: f64,
    /// Newest first.
    laps: Vec<Lap>,
}

impl StopwatchState {
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now_ms: f64) -> f64 {
        match self.started_at {
            // Clock skew must never run the display backwards.
            Some(start) => self.accumulated + (now_ms - start).max(0.0),
            None => self.accumulated,
        }
    }

    /// Resuming after a pause starts a fresh lap split.
    pub fn start(&mut self, now_ms: f64) {
        if self.started_at.is_none() {
            if self.accumulated > 0.0 {
                self.lap_start = self.accumulated;
            }
            self.started_at = Some(now_ms);
        }
    }

    pub fn stop(&mut self, now_ms: f64) {
        if self.started_at.is_some() {
            self.accumulated = self.elapsed(now_ms);
            self.started_at = None;
        }
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.is_running() {
            self.stop(now_ms);
        } else {
            self.start(now_ms);
        }
    }

    /// Returns `false` and leaves the state untouched while running.
    pub fn reset(&mut self) -> bool {
        if self.is_running() {
            log::debug!("stopwatch reset ignored while running");
            return false;
        }
        *self = Self::default();
        true
    }

    /// Records a lap when running or when some time has elapsed.
    pub fn lap(&mut self, now_ms: f64) -> Option<&Lap> {
        let time = self.elapsed(now_ms);
        if !self.is_running() && time <= 0.0 {
            return None;
        }
        let lap = Lap {
            number: self.laps.len() as u32 + 1,
            time,
            lap_time: time - self.lap_start,
        };
        self.lap_start = time;
        self.laps.insert(0, lap);
        self.laps.first()
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn snapshot(&self, now_ms: f64) -> StopwatchSnapshot {
        let elapsed_ms = self.elapsed(now_ms);
        StopwatchSnapshot {
            elapsed_ms,
            display: format_time(elapsed_ms),
            running: self.is_running(),
            laps: lap_views(&self.laps),
        }
    }
}

/// Fastest and slowest are only flagged once there is something to compare.
pub fn lap_views(laps: &[Lap]) -> Vec<LapView> {
    let ranked = laps.len() > 1;
    let fastest = laps.iter().map(|l| l.lap_time).fold(f64::INFINITY, f64::min);
    let slowest = laps
        .iter()
        .map(|l| l.lap_time)
        .fold(f64::NEG_INFINITY, f64::max);
    laps.iter()
        .map(|lap| {
            let is_fastest = ranked && lap.lap_time == fastest;
            LapView {
                number: lap.number,
                time: format_time(lap.time),
                lap_time: format_time(lap.lap_time),
                fastest: is_fastest,
                slowest: ranked && !is_fastest && lap.lap_time == slowest,
            }
        })
        .collect()
}

/// `MM:SS.cc`; minutes keep growing past 99.
pub fn format_time(ms: f64) -> String {
    let ms = if ms.is_finite() { ms.max(0.0) as u64 } else { 0 };
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let centis = (ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

#[wasm_bindgen]
#[derive(Default)]
pub struct Stopwatch {
    state: StopwatchState,
}

#[wasm_bindgen]
impl Stopwatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Stopwatch {
        Stopwatch::default()
    }

    pub fn toggle(&mut self) -> Result<JsValue, JsValue> {
        self.state.toggle(js_sys::Date::now());
        self.snapshot()
    }

    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        self.state.start(js_sys::Date::now());
        self.snapshot()
    }

    pub fn stop(&mut self) -> Result<JsValue, JsValue> {
        self.state.stop(js_sys::Date::now());
        self.snapshot()
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.state.reset();
        self.snapshot()
    }

    pub fn lap(&mut self) -> Result<JsValue, JsValue> {
        self.state.lap(js_sys::Date::now());
        self.snapshot()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.snapshot(js_sys::Date::now()))
            .map_err(|err| WidgetError::from(err).into())
    }
}

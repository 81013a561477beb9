//! Desktop stand-ins for the touch and sensor collaborators: the cursor acts
//! as the accelerometer, the mouse as the finger, and arrow keys or the
//! wheel flip pages.

use std::sync::{Arc, Mutex};

use chrono_dream::compositor::CardRect;
use chrono_dream::constants::DRAG_STEP_THRESHOLD;
use chrono_dream::{ClockMode, Gesture, SensorError, TiltPublisher, TiltSensor, TiltVector};
use instant::Instant;

const LONG_PRESS_SEC: f32 = 0.5;
const DOUBLE_TAP_SEC: f32 = 0.3;
const TAP_SLOP_PX: f32 = 8.0;
const PAGE_FLIP_SEC: f32 = 0.35;

/// Cursor position mapped to tilt: window centre is level, edges are a full
/// unit of roll (x) and pitch (y).
#[derive(Clone, Default)]
pub struct CursorTilt {
    publisher: Arc<Mutex<Option<TiltPublisher>>>,
}

impl CursorTilt {
    pub fn cursor_moved(&self, x: f32, y: f32, size: [f32; 2]) {
        let Ok(guard) = self.publisher.lock() else {
            return;
        };
        if let Some(p) = guard.as_ref() {
            let roll = x / size[0].max(1.0) * 2.0 - 1.0;
            let pitch = y / size[1].max(1.0) * 2.0 - 1.0;
            p.publish(TiltVector::new(pitch, roll));
        }
    }
}

impl TiltSensor for CursorTilt {
    fn register(&mut self, publisher: TiltPublisher) -> Result<(), SensorError> {
        let mut guard = self
            .publisher
            .lock()
            .map_err(|e| SensorError::Register(e.to_string()))?;
        *guard = Some(publisher);
        Ok(())
    }

    fn unregister(&mut self) -> Result<(), SensorError> {
        let mut guard = self
            .publisher
            .lock()
            .map_err(|e| SensorError::Unregister(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

struct Press {
    at: Instant,
    x: f32,
    y: f32,
}

/// Turns raw mouse button and motion events into gestures.
#[derive(Default)]
pub struct Pointer {
    cursor: [f32; 2],
    press: Option<Press>,
    last_tap: Option<Instant>,
}

impl Pointer {
    pub fn moved(&mut self, x: f32, y: f32) {
        self.cursor = [x, y];
    }

    pub fn pressed(&mut self) {
        self.press = Some(Press {
            at: Instant::now(),
            x: self.cursor[0],
            y: self.cursor[1],
        });
    }

    pub fn released(&mut self, mode: ClockMode, card: Option<CardRect>) -> Vec<Gesture> {
        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        let dx = self.cursor[0] - press.x;
        let dy = self.cursor[1] - press.y;
        if dx.abs() > DRAG_STEP_THRESHOLD && dx.abs() > dy.abs() {
            return vec![Gesture::Drag { amount: dx }];
        }
        if dx.hypot(dy) > TAP_SLOP_PX {
            return Vec::new();
        }
        if press.at.elapsed().as_secs_f32() >= LONG_PRESS_SEC {
            self.last_tap = None;
            return vec![Gesture::LongPress];
        }
        let now = Instant::now();
        if self
            .last_tap
            .is_some_and(|t| now.duration_since(t).as_secs_f32() < DOUBLE_TAP_SEC)
        {
            self.last_tap = None;
            return vec![Gesture::DoubleTap];
        }
        self.last_tap = Some(now);
        let mut out = vec![Gesture::Tap];
        if mode == ClockMode::Binary {
            if let Some(column) = card.and_then(|c| binary_column(c, press.x, press.y)) {
                out.push(Gesture::TapBinaryColumn { column });
            }
        }
        out
    }
}

/// Which of the six binary columns the point falls in, if inside the card.
fn binary_column(card: CardRect, x: f32, y: f32) -> Option<usize> {
    let [ox, oy] = card.content_origin();
    let [w, h] = card.content_size();
    if x < ox || x >= ox + w || y < oy || y >= oy + h {
        return None;
    }
    Some((((x - ox) / w) * 6.0) as usize).filter(|c| *c < 6)
}

struct Flip {
    from: usize,
    to: usize,
    elapsed: f32,
}

/// A paged container: animates the scroll offset between neighbouring pages
/// and reports it the way a touch pager would.
#[derive(Default)]
pub struct Pager {
    page: usize,
    flip: Option<Flip>,
}

impl Pager {
    pub fn request(&mut self, delta: i32) {
        if self.flip.is_some() {
            return;
        }
        let target = (self.page as i32 + delta).clamp(0, ClockMode::COUNT as i32 - 1) as usize;
        if target != self.page {
            self.flip = Some(Flip {
                from: self.page,
                to: target,
                elapsed: 0.0,
            });
        }
    }

    pub fn tick(&mut self, dt_sec: f32) -> Option<Gesture> {
        let flip = self.flip.as_mut()?;
        flip.elapsed += dt_sec;
        if flip.elapsed >= PAGE_FLIP_SEC {
            let page = flip.to;
            self.page = page;
            self.flip = None;
            return Some(Gesture::PageSettled { page });
        }
        let direction = if flip.to > flip.from { 1.0 } else { -1.0 };
        Some(Gesture::PageScroll {
            page: flip.from,
            offset: direction * flip.elapsed / PAGE_FLIP_SEC,
        })
    }
}

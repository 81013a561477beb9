mod gpu;
mod input;

use instant::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use chrono_dream::compositor::CardRect;
use chrono_dream::constants::DRAG_STEP_THRESHOLD;
use chrono_dream::{DreamSession, Gesture, HapticEvent, HapticSink, SessionConfig, Settings};
use gpu::GpuState;
use input::{CursorTilt, Pager, Pointer};

/// Desktops have no vibration motor; the events go to the log.
struct LogHaptics;

impl HapticSink for LogHaptics {
    fn emit(&mut self, event: HapticEvent) {
        log::debug!("[haptic] {event:?}");
    }
}

fn key_gesture(key: &Key) -> Option<Gesture> {
    let step = DRAG_STEP_THRESHOLD + 1.0;
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(Gesture::Drag { amount: step }),
        Key::Named(NamedKey::ArrowDown) => Some(Gesture::Drag { amount: -step }),
        Key::Named(NamedKey::Space) => Some(Gesture::Tap),
        Key::Named(NamedKey::Escape) => Some(Gesture::CloseSettings),
        Key::Character(c) if c.as_str() == "f" => Some(Gesture::LongPress),
        Key::Character(c) if c.as_str() == "s" => Some(Gesture::DoubleTap),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("CHRONOTIME")
        .with_inner_size(LogicalSize::new(540.0, 960.0))
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut session = DreamSession::new(
        SessionConfig {
            canvas: state.size(),
            ..SessionConfig::default()
        },
        Settings::default(),
    )?;
    session.set_haptic_sink(Box::new(LogHaptics));
    let cursor = CursorTilt::default();
    session.attach(state.size(), Some(Box::new(cursor.clone())))?;

    let mut pointer = Pointer::default();
    let mut pager = Pager::default();
    let mut card: Option<CardRect> = None;
    let mut title = String::new();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
                session.resize(state.size());
            }
            WindowEvent::CloseRequested => {
                session.detach();
                elwt.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                cursor.cursor_moved(x, y, state.size());
                pointer.moved(x, y);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => pointer.pressed(),
                ElementState::Released => {
                    let mode = session.mode_config().mode();
                    for g in pointer.released(mode, card) {
                        session.handle(g);
                    }
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                if dy != 0.0 {
                    pager.request(if dy < 0.0 { 1 } else { -1 });
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match &event.logical_key {
                    Key::Named(NamedKey::ArrowRight) => pager.request(1),
                    Key::Named(NamedKey::ArrowLeft) => pager.request(-1),
                    key => {
                        if let Some(g) = key_gesture(key).filter(|_| !event.repeat) {
                            session.handle(g);
                        }
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;
            if let Some(g) = pager.tick(dt) {
                session.handle(g);
            }
            let Some(frame) = session.frame(dt) else {
                return;
            };
            card = Some(frame.card_rect);
            let next = match &frame.chrome {
                Some(c) => format!("{} · {} · {}", c.title, c.mode_name, frame.headline()),
                None => frame.headline(),
            };
            if next != title {
                state.window.set_title(&next);
                title = next;
            }
            match state.render(&frame) {
                Ok(()) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::warn!("[gpu] out of memory; closing");
                    session.detach();
                    elwt.exit();
                }
                Err(e) => log::debug!("[gpu] skipped frame: {e}"),
            }
        }
        Event::LoopExiting => session.detach(),
        _ => {}
    })?;
    Ok(())
}

mod export;
mod gfx;
mod i18n;
mod modals;
mod panels;
mod session;
mod ui;

use anyhow::Result;
use glint_renderer::{CameraInput, Vec2};
use std::collections::HashSet;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use gfx::Gfx;
use session::Session;

/// Application state
struct App {
    window: Option<std::sync::Arc<Window>>,
    gfx: Option<Gfx>,
    session: Session,

    // Input state
    look_held: bool,
    last_mouse_pos: Option<(f64, f64)>,
    mouse_delta: Vec2,
    keys_pressed: HashSet<KeyCode>,
    cursor_locked: bool,
    window_title: String,

    last_frame_time: Instant,
    start_time: Instant,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gfx: None,
            session: Session::new(),
            look_held: false,
            last_mouse_pos: None,
            mouse_delta: Vec2::ZERO,
            keys_pressed: HashSet::new(),
            cursor_locked: false,
            window_title: String::new(),
            last_frame_time: Instant::now(),
            start_time: Instant::now(),
        }
    }

    /// Raw device state is tracked before egui sees the event, so camera
    /// input keeps flowing while the pointer is over the viewport image.
    fn track_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                self.look_held = *state == ElementState::Pressed;
                if !self.look_held {
                    self.last_mouse_pos = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_mouse_pos {
                    self.mouse_delta += Vec2::new(
                        (position.x - last.0) as f32,
                        (position.y - last.1) as f32,
                    );
                }
                self.last_mouse_pos = Some((position.x, position.y));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => {
                match state {
                    ElementState::Pressed => self.keys_pressed.insert(*keycode),
                    ElementState::Released => self.keys_pressed.remove(keycode),
                };
            }
            _ => {}
        }
    }

    /// Snapshot and drain one frame of camera input.
    fn camera_input(&mut self) -> CameraInput {
        let mouse_delta = std::mem::take(&mut self.mouse_delta);
        CameraInput {
            mouse_delta,
            look_held: self.look_held,
            move_forward: self.keys_pressed.contains(&KeyCode::KeyW),
            move_back: self.keys_pressed.contains(&KeyCode::KeyS),
            move_left: self.keys_pressed.contains(&KeyCode::KeyA),
            move_right: self.keys_pressed.contains(&KeyCode::KeyD),
            move_up: self.keys_pressed.contains(&KeyCode::Space),
            move_down: self.keys_pressed.contains(&KeyCode::ControlLeft),
            boost: self.keys_pressed.contains(&KeyCode::ShiftLeft),
        }
    }

    fn update_cursor_lock(&mut self) {
        let lock = self.look_held && self.session.viewport_focused();
        if lock == self.cursor_locked {
            return;
        }
        if let Some(window) = &self.window {
            let mode = if lock {
                CursorGrabMode::Confined
            } else {
                CursorGrabMode::None
            };
            if window.set_cursor_grab(mode).is_err() && lock {
                // Some platforms only support full lock.
                let _ = window.set_cursor_grab(CursorGrabMode::Locked);
            }
            window.set_cursor_visible(!lock);
        }
        self.cursor_locked = lock;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Glint")
                .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

            let window = std::sync::Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            let gfx = pollster::block_on(Gfx::new(window.clone())).expect("Failed to initialize graphics");

            self.window = Some(window);
            self.gfx = Some(gfx);

            log::info!("Window and graphics initialized");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.track_input(&event);

        // Let egui handle the event next; consumed events only feed the
        // input tracking above.
        if let (Some(gfx), Some(window)) = (&mut self.gfx, &self.window) {
            if gfx.handle_event(window, &event)
                && !matches!(event, WindowEvent::RedrawRequested)
            {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                if self.session.unsaved_changes() {
                    self.session.modals.close_confirmation_open = true;
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                } else {
                    log::info!("Close requested");
                    self.session.save_settings();
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize((physical_size.width, physical_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                let input = self.camera_input();
                let elapsed = self.start_time.elapsed().as_secs_f32();
                self.session.on_update(&input, delta_time, elapsed);
                self.update_cursor_lock();

                if let (Some(gfx), Some(window)) = (&mut self.gfx, &self.window) {
                    let session = &mut self.session;
                    if let Err(e) = gfx.render(window, |ctx| ui::draw(ctx, session)) {
                        if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                            match surface_err {
                                wgpu::SurfaceError::Lost => {
                                    let size = gfx.size;
                                    gfx.resize(size);
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    log::error!("Out of memory!");
                                    event_loop.exit();
                                }
                                _ => {
                                    log::error!("Surface error: {:?}", surface_err);
                                }
                            }
                        } else {
                            log::error!("Render error: {:?}", e);
                        }
                    }

                    let title = format!("Glint - {}", self.session.scene.name);
                    if title != self.window_title {
                        window.set_title(&title);
                        self.window_title = title;
                    }
                }

                if self.session.take_exit_request() {
                    self.session.save_settings();
                    event_loop.exit();
                    return;
                }

                // Progressive refinement: keep the frames coming.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Glint");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    Ok(())
}

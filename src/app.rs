use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::TourConfig;
use crate::frame::{FpsCounter, FrameClock};
use crate::input::command_for_key;
use crate::intro::{IntroEvent, IntroTimeline};
use crate::loaders::load_scene;
use crate::renderer::{DebugStats, OverlayView, Renderer};
use crate::scene::SceneAsset;
use crate::text::SplitText;
use crate::tour::{ControlClass, ControlCommand, Tour};
use crate::viewport::Viewport;

pub struct App {
    config: TourConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    tour: Tour,
    title: SplitText,
    intro: IntroTimeline,
    clock: FrameClock,
    fps: FpsCounter,
    loader: Option<Receiver<Result<SceneAsset>>>,
    pending_scene: Option<SceneAsset>,
}

impl App {
    /// Starts loading the model in the background right away
    pub fn new(config: TourConfig) -> Self {
        let viewport = Viewport::new(config.window.width, config.window.height);
        let tour = Tour::new(config.anchors(), config.time_scale, viewport);
        let title = SplitText::new(&config.title);
        let intro = IntroTimeline::new(config.intro, title.len());

        let (tx, rx) = mpsc::channel();
        let model = config.model.clone();
        thread::spawn(move || {
            // Receiver gone means the app already exited
            let _ = tx.send(load_scene(&model));
        });

        Self {
            config,
            window: None,
            renderer: None,
            tour,
            title,
            intro,
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            loader: Some(rx),
            pending_scene: None,
        }
    }

    fn poll_loader(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };
        match loader.try_recv() {
            Ok(Ok(asset)) => {
                self.pending_scene = Some(asset);
                self.loader = None;
            }
            Ok(Err(e)) => {
                log::error!("Model failed to load: {:#}", e);
                self.loader = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("Model loader stopped without a result");
                self.loader = None;
            }
        }
    }

    /// Hand a loaded model to the renderer and the tour once both exist
    fn install_scene(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let Some(asset) = self.pending_scene.take() else {
            return;
        };
        renderer.upload_scene(&asset);
        self.tour.attach_scene(asset);
        self.tour.set_viewport(renderer.size().into());
    }

    fn controls_active(&self) -> bool {
        self.tour.classes().contains(ControlClass::Active)
    }

    fn apply_command(&mut self, command: ControlCommand) {
        if self.controls_active() {
            self.tour.handle_control(command);
        }
    }

    fn redraw(&mut self) {
        let frame = self.clock.tick();
        self.fps.update(frame.delta);

        if let Some(IntroEvent::Completed) = self.intro.advance(frame.delta) {
            self.tour.activate_controls();
        }
        self.tour.update(frame.delta);

        let intro_frame = (!self.intro.is_complete()).then(|| self.intro.frame());
        let debug = self.config.debug.then(|| DebugStats {
            fps: self.fps.fps(),
            frame_time_ms: self.fps.frame_time_ms(),
            primitives: self.renderer.as_ref().map_or(0, Renderer::primitive_count),
        });
        let view = OverlayView {
            title: &self.title,
            intro: intro_frame.as_ref(),
            show_ui: self.config.show_ui,
            debug,
        };

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };
        let commands = match renderer.render(window, &self.tour, &view) {
            Ok(commands) => commands,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size());
                Vec::new()
            }
            Err(e) => {
                log::error!("Render error: {}", e);
                Vec::new()
            }
        };

        for command in commands {
            self.apply_command(command);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window.clone(), &self.config)) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.tour.set_viewport(window.inner_size().into());
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.install_scene();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(command) = command_for_key(code) {
                    self.apply_command(command);
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
                self.tour.set_viewport(size.into());
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.pending_scene.is_none() {
            self.poll_loader();
        }
        self.install_scene();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it closes
pub fn run(config: TourConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

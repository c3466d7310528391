use anyhow::Result;
use axis_config::AppConfig;
use axis_midi::types::DeviceEvent;
use axis_midi::{EventSink, MidiClient};
use axis_renderer::GpuCubeRenderer;
use axis_view::{ErrorSurface, ViewAction, ViewController};
use std::sync::Arc;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

type View = ViewController<GpuCubeRenderer, MidiClient, TitleErrorSurface, Arc<Window>>;

/// Forwards transport events into the winit event loop.
struct ProxySink(EventLoopProxy<DeviceEvent>);

impl EventSink for ProxySink {
    fn deliver(&self, event: DeviceEvent) -> bool {
        self.0.send_event(event).is_ok()
    }
}

/// Shows setup failures in the window title.
struct TitleErrorSurface {
    window: Arc<Window>,
    title: String,
}

impl ErrorSurface for TitleErrorSurface {
    fn error(&mut self, message: &str) {
        self.window.set_title(&format!("{}: {}", self.title, message));
    }
}

/// Application state.
struct App {
    config: AppConfig,
    /// Moved into the view once the window exists.
    midi: Option<MidiClient>,
    window: Option<Arc<Window>>,
    view: Option<View>,
    /// A device has connected and not yet disconnected.
    device_connected: bool,
    /// Fatal failure raised inside the event loop, returned from `main`.
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig, midi: MidiClient) -> Self {
        Self {
            config,
            midi: Some(midi),
            window: None,
            view: None,
            device_connected: false,
            startup_error: None,
        }
    }

    fn show_view(&mut self) {
        if let (Some(view), Some(window)) = (&mut self.view, &self.window) {
            let window = window.clone();
            view.show(move || GpuCubeRenderer::attach(window));
        }
    }
}

impl ApplicationHandler<DeviceEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(?e, "Failed to create window");
                self.startup_error = Some(anyhow::anyhow!("creating window: {e}"));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let Some(midi) = self.midi.take() else {
            return;
        };
        let errors = TitleErrorSurface {
            window: window.clone(),
            title: self.config.window.title.clone(),
        };
        self.view = Some(ViewController::new(
            window,
            midi,
            errors,
            self.config.view.invert,
        ));

        if self.device_connected {
            self.show_view();
        }

        info!("Application initialized");
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected => {
                info!("Device connected");
                self.device_connected = true;
                if let Some(view) = &mut self.view {
                    view.reset();
                }
                self.show_view();
            }
            DeviceEvent::Disconnected => {
                info!("Device disconnected");
                self.device_connected = false;
                if let Some(view) = &mut self.view {
                    view.reset();
                }
            }
            DeviceEvent::ControlChange(message) => {
                if let Some(view) = &mut self.view {
                    let _ = view.on_control_change(message);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(view) = &self.view {
                    self.config.view.invert = view.invert();
                }
                if let Err(e) = axis_config::save_config(&self.config) {
                    error!(?e, "Failed to save config");
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(view) = &mut self.view {
                    view.on_resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                if let (Some(action), Some(view)) = (ViewAction::from_key(code), &mut self.view) {
                    view.apply(action);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(view) = &mut self.view {
                    view.on_redraw();
                }
            }

            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "axis_app=info,axis_midi=info,axis_renderer=info,axis_view=info".into()
            }),
        )
        .init();

    info!("Axis orientation view starting");

    let config = axis_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let event_loop = EventLoop::<DeviceEvent>::with_user_event().build()?;
    let sink = || ProxySink(event_loop.create_proxy());

    // Fall back to the demo source when no device is available.
    let midi = match config.midi.port {
        Some(_) => match MidiClient::connect(&config.midi, sink()) {
            Ok(client) => client,
            Err(e) => {
                warn!(?e, "MIDI port not available, using demo source");
                MidiClient::demo(sink())
            }
        },
        None => {
            info!("No MIDI port configured, using demo source");
            MidiClient::demo(sink())
        }
    };

    let mut app = App::new(config, midi);
    event_loop.run_app(&mut app)?;

    startup_result(app.startup_error.take())
}

/// Turn a failure recorded during the event loop into the process result.
fn startup_result(error: Option<anyhow::Error>) -> Result<()> {
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

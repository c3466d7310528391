use crate::input::ViewAction;
use crate::{CommandSink, ErrorSurface};
use axis_midi::types::{cc, ControlChange, MidiCommand};
use axis_midi::{ComponentDecoder, DecodeOutcome, OrientationState};
use axis_renderer::{CubeRenderer, FrameScheduler, RedrawHost, RenderError};
use glam::Quat;
use tracing::{debug, error, info, trace};

/// Channel used for every outbound command.
const COMMAND_CHANNEL: u8 = 0;

/// Ties the control link, the decoder, frame scheduling and the renderer
/// together for one view.
///
/// Everything runs on the UI thread. Renderer resources exist only between
/// a successful [`show`](Self::show) and the next [`reset`](Self::reset).
pub struct ViewController<R, C, E, H> {
    decoder: ComponentDecoder,
    invert: bool,
    renderer: Option<R>,
    scheduler: FrameScheduler,
    commands: C,
    errors: E,
    host: H,
}

impl<R, C, E, H> ViewController<R, C, E, H>
where
    R: CubeRenderer,
    C: CommandSink,
    E: ErrorSurface,
    H: RedrawHost,
{
    pub fn new(host: H, commands: C, errors: E, invert: bool) -> Self {
        Self {
            decoder: ComponentDecoder::new(),
            invert,
            renderer: None,
            scheduler: FrameScheduler::new(),
            commands,
            errors,
            host,
        }
    }

    /// The view became visible: clear state, build the renderer and paint once.
    ///
    /// If `attach` fails the error is reported once and the view stays dark;
    /// later state changes are ignored until the next `show`.
    pub fn show<F>(&mut self, attach: F)
    where
        F: FnOnce() -> Result<R, RenderError>,
    {
        self.decoder.reset();
        self.renderer = None;

        match attach() {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                info!("Orientation view attached");
                self.send_control_change(cc::ALL_NOTES_OFF);
                self.state_changed();
            }
            Err(e) => {
                let message = e.to_string();
                error!(%message, "Render pipeline setup failed");
                self.errors.error(&message);
            }
        }
    }

    /// Device went away or the app reset: release the renderer and clear state.
    pub fn reset(&mut self) {
        if self.renderer.take().is_some() {
            info!("Orientation view detached");
        }
        self.scheduler.cancel();
        self.decoder.reset();
        self.state_changed();
    }

    pub fn on_control_change(&mut self, message: ControlChange) -> DecodeOutcome {
        let outcome = self.decoder.apply(message.controller, message.value);
        match outcome {
            DecodeOutcome::Changed(_) => self.state_changed(),
            DecodeOutcome::Stored => {}
            DecodeOutcome::Dropped => {
                trace!(?message, "Least-significant value without most-significant, dropped");
            }
            DecodeOutcome::Ignored => trace!(?message, "Unrecognized controller"),
        }
        outcome
    }

    /// Host refresh callback. Draws the state live at this moment.
    /// A frame the surface could not present is requested again.
    pub fn on_redraw(&mut self) {
        self.scheduler.fire();
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let drawn = renderer.draw(
            Quat::from_array(self.decoder.orientation().quaternion),
            self.invert,
        );
        if !drawn {
            debug!("Frame not presented, retrying on next refresh");
            self.state_changed();
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
        self.state_changed();
    }

    pub fn apply(&mut self, action: ViewAction) {
        debug!(?action, "View action");
        match action {
            ViewAction::ResetOrientation => {
                self.commands.send(MidiCommand::SystemReset);
                self.decoder.reset();
                self.state_changed();
            }
            ViewAction::Recenter => self.send_control_change(cc::RECENTER),
            ViewAction::CalibrateSave => self.send_control_change(cc::CALIBRATE_SAVE),
            ViewAction::ToggleInvert => {
                self.invert = !self.invert;
                self.state_changed();
            }
        }
    }

    pub fn orientation(&self) -> OrientationState {
        self.decoder.orientation()
    }

    pub fn decoder(&self) -> &ComponentDecoder {
        &self.decoder
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.is_some()
    }

    fn send_control_change(&self, controller: u8) {
        self.commands.send(MidiCommand::ControlChange {
            channel: COMMAND_CHANNEL,
            controller,
            value: 0,
        });
    }

    /// Without a renderer there is nothing to paint, so the request is swallowed.
    fn state_changed(&mut self) {
        if self.renderer.is_some() {
            self.scheduler.request_frame(&self.host);
        }
    }
}

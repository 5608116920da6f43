use crate::camera::CameraDevice;
use crate::compositor::FrameCompositor;
use crate::controller::ModeController;
use crate::display::DisplaySurface;
use crate::input::InputPoller;

/// Everything one viewfinder run owns: the three devices, the mode
/// controller and the compositor. Built at startup, torn down once.
pub struct Session<C, D, I> {
    pub(crate) camera: C,
    pub(crate) display: D,
    pub(crate) input: I,
    pub(crate) controller: ModeController,
    pub(crate) compositor: FrameCompositor,
    pub(crate) display_offset: (u32, u32),
    pub(super) torn_down: bool,
}

impl<C, D, I> Session<C, D, I>
where
    C: CameraDevice,
    D: DisplaySurface,
    I: InputPoller,
{
    pub fn new(
        camera: C,
        display: D,
        input: I,
        controller: ModeController,
        compositor: FrameCompositor,
        display_offset: (u32, u32),
    ) -> Self {
        Self {
            camera,
            display,
            input,
            controller,
            compositor,
            display_offset,
            torn_down: false,
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn display_offset(&self) -> (u32, u32) {
        self.display_offset
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

//! The per-tick update pass.
//!
//! [`HandModel`] owns every piece of per-instance state: the rig lifecycle,
//! the smoothers, the procedural mesh and the camera. The transport only
//! touches the shared [`FrameMailbox`]; everything else is mutated from
//! [`HandModel::tick`] on the caller's thread.

use std::sync::mpsc::{Receiver, TryRecvError};

use glam::Vec3;
use tracing::{debug, info, warn};

use handrig_data::{
    FrameError, HAND_CONNECTIONS, LANDMARK_COUNT, Landmark, Rig, RigLoadError, map_frame,
};

use crate::camera::{CameraFraming, CameraPose};
use crate::config::PoseConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ingest::FrameMailbox;
use crate::mesh::{MeshSet, ProceduralMeshSynthesizer, SynthesisError};
use crate::retarget::{BoneBindings, RetargetReport, RigState, Skeleton, SkeletonRetargeter};
use crate::smoothing::TemporalSmoother;

/// What the renderer should draw this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Bone rotations on the loaded rig.
    Rigged,
    /// The rebuilt tube mesh.
    Procedural,
    /// Nothing; the model has been disposed.
    Inactive,
}

/// Summary of one [`HandModel::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub state: RigState,
    pub mode: RenderMode,
    /// A frame was taken from the mailbox and applied.
    pub applied_frame: bool,
    /// Frames dropped as malformed since the previous tick.
    pub rejected_frames: u64,
    /// Scene points that moved this tick.
    pub points_updated: usize,
    pub retarget: Option<RetargetReport>,
    pub mesh_rebuilt: bool,
}

impl TickReport {
    fn idle(state: RigState, mode: RenderMode) -> Self {
        Self {
            state,
            mode,
            applied_frame: false,
            rejected_frames: 0,
            points_updated: 0,
            retarget: None,
            mesh_rebuilt: false,
        }
    }
}

struct RiggedPose {
    skeleton: Box<dyn Skeleton>,
    retargeter: SkeletonRetargeter,
}

pub struct HandModel {
    config: PoseConfig,
    sink: Box<dyn DiagnosticSink>,
    mailbox: FrameMailbox,
    state: RigState,
    loader: Option<Receiver<Result<Rig, RigLoadError>>>,
    rigged: Option<RiggedPose>,
    points: TemporalSmoother,
    synthesizer: ProceduralMeshSynthesizer,
    camera: CameraFraming,
    tracking: bool,
}

impl HandModel {
    pub fn new(config: PoseConfig, sink: Box<dyn DiagnosticSink>) -> Self {
        let points = TemporalSmoother::new(LANDMARK_COUNT, config.smoothing_params());
        let synthesizer = ProceduralMeshSynthesizer::new(config.synthesis_params());
        let camera = CameraFraming::from_config(&config);
        Self {
            config,
            sink,
            mailbox: FrameMailbox::new(),
            state: RigState::Unloaded,
            loader: None,
            rigged: None,
            points,
            synthesizer,
            camera,
            tracking: true,
        }
    }

    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// A handle the transport can post frames into from any thread.
    pub fn mailbox(&self) -> FrameMailbox {
        self.mailbox.clone()
    }

    pub fn submit(&self, landmarks: Vec<Landmark>) -> Result<(), FrameError> {
        self.mailbox.post(landmarks)
    }

    pub fn rig_state(&self) -> RigState {
        self.state
    }

    pub fn render_mode(&self) -> RenderMode {
        match self.state {
            RigState::ReadyRigged => RenderMode::Rigged,
            RigState::Disposed => RenderMode::Inactive,
            _ => RenderMode::Procedural,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// While paused, frames keep arriving in the mailbox but are discarded
    /// unapplied on each tick.
    pub fn set_tracking(&mut self, tracking: bool) {
        if self.tracking != tracking {
            info!(tracking, "Hand tracking toggled");
        }
        self.tracking = tracking;
    }

    /// Start waiting on a rig load. Any previously attached rig is dropped
    /// and all smoothing state starts over.
    pub fn begin_loading(&mut self, receiver: Receiver<Result<Rig, RigLoadError>>) {
        if self.state.is_disposed() {
            return;
        }
        self.rigged = None;
        self.reset_smoothing();
        self.camera.reset();
        self.loader = Some(receiver);
        self.transition(RigState::Loading);
    }

    /// Bind an already loaded skeleton and switch to rigged mode, unless the
    /// configuration forces procedural rendering.
    pub fn attach_skeleton(&mut self, skeleton: Box<dyn Skeleton>) {
        if self.state.is_disposed() {
            return;
        }
        self.loader = None;
        self.reset_smoothing();

        if self.config.force_procedural {
            info!("Rig ignored, procedural rendering is forced");
            self.rigged = None;
            self.transition(RigState::ReadyProcedural);
            return;
        }

        let bindings = BoneBindings::resolve(
            skeleton.as_ref(),
            &self.config.binding_table(),
            self.config.rest_conventions(),
            self.sink.as_mut(),
        );
        if let Some(bounds) = skeleton.bounds() {
            self.camera.frame_bounds(&bounds);
        }
        let retargeter = SkeletonRetargeter::new(bindings, self.config.smoothing_params());
        self.rigged = Some(RiggedPose {
            skeleton,
            retargeter,
        });
        self.transition(RigState::ReadyRigged);
    }

    /// Reset all smoothing state without touching the rig.
    pub fn restart(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        self.reset_smoothing();
        debug!("Hand model restarted");
    }

    pub fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        self.loader = None;
        self.rigged = None;
        self.synthesizer.clear();
        self.reset_smoothing();
        self.transition(RigState::Disposed);
    }

    /// Re-frame the camera on the rig's current bounds.
    pub fn reframe(&mut self) -> Option<CameraPose> {
        let bounds = self.rigged.as_ref()?.skeleton.bounds()?;
        Some(self.camera.frame_bounds(&bounds))
    }

    pub fn tick(&mut self) -> TickReport {
        if self.state.is_disposed() {
            return TickReport::idle(self.state, RenderMode::Inactive);
        }
        self.poll_loader();

        let delivery = self.mailbox.take();
        let mut report = TickReport::idle(self.state, self.render_mode());
        report.rejected_frames = delivery.rejected;
        if let Some(error) = delivery.last_error {
            self.sink.emit(Diagnostic::MalformedFrame {
                error,
                dropped: delivery.rejected,
            });
        }

        let Some(frame) = delivery.frame else {
            return report;
        };
        if !self.tracking {
            return report;
        }
        report.applied_frame = true;

        let mapped = map_frame(&frame);
        for (i, point) in mapped.iter().enumerate() {
            if self.points.smooth_position(i, point.position).applied() {
                report.points_updated += 1;
            }
        }

        match self.rigged.as_mut() {
            Some(rigged) if self.state.is_rigged() => {
                let retarget =
                    rigged
                        .retargeter
                        .apply(rigged.skeleton.as_mut(), &mapped, self.sink.as_mut());
                report.retarget = Some(retarget);
            }
            _ => {
                let smoothed: Vec<Vec3> = self.points.positions().into_iter().flatten().collect();
                match self.synthesizer.synthesize(&smoothed) {
                    Ok(_) => report.mesh_rebuilt = true,
                    Err(SynthesisError::InvalidPointCount { expected, actual }) => {
                        self.sink
                            .emit(Diagnostic::InvalidPointCount { expected, actual });
                    }
                }
                self.camera.follow(&smoothed);
            }
        }

        report
    }

    pub fn skeleton(&self) -> Option<&dyn Skeleton> {
        self.rigged.as_ref().map(|r| r.skeleton.as_ref())
    }

    pub fn bindings(&self) -> Option<&BoneBindings> {
        self.rigged.as_ref().map(|r| r.retargeter.bindings())
    }

    /// The last successfully synthesized procedural mesh.
    pub fn meshes(&self) -> Option<&MeshSet> {
        self.synthesizer.current()
    }

    pub fn camera(&self) -> CameraPose {
        self.camera.pose()
    }

    /// Smoothed scene points, or `None` before the first applied frame.
    pub fn scene_points(&self) -> Option<[Vec3; LANDMARK_COUNT]> {
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (slot, position) in points.iter_mut().zip(self.points.positions()) {
            *slot = position?;
        }
        Some(points)
    }

    /// Landmark index pairs for a debug skeleton overlay.
    pub fn connections(&self) -> &'static [(usize, usize)] {
        &HAND_CONNECTIONS
    }

    /// Overlay segments in scene space.
    pub fn overlay_segments(&self) -> Vec<(Vec3, Vec3)> {
        self.scene_points()
            .map(|points| {
                HAND_CONNECTIONS
                    .iter()
                    .map(|&(a, b)| (points[a], points[b]))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn poll_loader(&mut self) {
        let Some(receiver) = self.loader.as_ref() else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(rig)) => {
                info!(rig = %rig.name, bones = rig.len(), "Rig loaded");
                self.attach_skeleton(Box::new(rig));
            }
            Ok(Err(err)) => self.fail_loading(err.to_string()),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.fail_loading("rig loader exited without a result".to_string());
            }
        }
    }

    fn fail_loading(&mut self, reason: String) {
        warn!(%reason, "Rig load failed");
        self.loader = None;
        self.rigged = None;
        self.sink.emit(Diagnostic::AssetLoadFailure { reason });
        self.transition(RigState::ReadyProcedural);
    }

    fn reset_smoothing(&mut self) {
        self.points.reset();
        if let Some(rigged) = self.rigged.as_mut() {
            rigged.retargeter.reset();
        }
    }

    fn transition(&mut self, to: RigState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.sink.emit(Diagnostic::RigStateChanged { from, to });
    }
}

//! Rig lifecycle

/// Lifecycle of the model's rig.
///
/// `Unloaded → Loading → ReadyRigged | ReadyProcedural → Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigState {
    #[default]
    Unloaded,
    Loading,
    /// Bindings resolved; poses drive the rig.
    ReadyRigged,
    /// No usable rig; poses drive the procedural mesh.
    ReadyProcedural,
    Disposed,
}

impl RigState {
    pub fn is_rigged(self) -> bool {
        self == RigState::ReadyRigged
    }

    pub fn is_disposed(self) -> bool {
        self == RigState::Disposed
    }
}

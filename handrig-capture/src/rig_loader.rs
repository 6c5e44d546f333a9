//! Background rig asset loading.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::warn;

use handrig_data::{Rig, RigLoadError, load_rig};

/// Load a rig on a worker thread. The receiver yields exactly one result;
/// hand it to `HandModel::begin_loading`.
pub fn spawn_rig_load(path: impl Into<PathBuf>) -> Receiver<Result<Rig, RigLoadError>> {
    let path = path.into();
    let (sender, receiver) = mpsc::channel();
    let worker_sender = sender.clone();

    let spawned = thread::Builder::new()
        .name("handrig-rig-loader".to_string())
        .spawn(move || {
            // The model may have been torn down already.
            let _ = worker_sender.send(load_rig(&path));
        });

    if let Err(err) = spawned {
        warn!(%err, "Could not start rig loader thread");
        let _ = sender.send(Err(RigLoadError::Io(err)));
    }
    receiver
}

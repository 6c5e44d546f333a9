//! Shared fixtures for unit tests.

use glam::Vec3;
use handrig_data::{Landmark, Rig, RigBone};

/// A relaxed open right hand facing the camera.
pub fn open_hand_landmarks() -> Vec<Landmark> {
    vec![
        Landmark::new(0.50, 0.80, 0.00),
        // thumb
        Landmark::new(0.42, 0.75, -0.01),
        Landmark::new(0.37, 0.68, -0.02),
        Landmark::new(0.33, 0.62, -0.03),
        Landmark::new(0.30, 0.57, -0.04),
        // index
        Landmark::new(0.45, 0.60, -0.01),
        Landmark::new(0.44, 0.50, -0.02),
        Landmark::new(0.44, 0.44, -0.03),
        Landmark::new(0.43, 0.39, -0.04),
        // middle
        Landmark::new(0.50, 0.58, -0.01),
        Landmark::new(0.50, 0.47, -0.02),
        Landmark::new(0.50, 0.40, -0.03),
        Landmark::new(0.50, 0.34, -0.04),
        // ring
        Landmark::new(0.55, 0.60, -0.01),
        Landmark::new(0.56, 0.50, -0.02),
        Landmark::new(0.56, 0.44, -0.03),
        Landmark::new(0.57, 0.39, -0.04),
        // pinky
        Landmark::new(0.60, 0.63, -0.01),
        Landmark::new(0.62, 0.56, -0.02),
        Landmark::new(0.63, 0.51, -0.03),
        Landmark::new(0.64, 0.47, -0.04),
    ]
}

/// A hand rig named `Wrist`, `Thumb1..3`, `Index1..4`, ... `Pinky1..4`,
/// leaving out any bone listed in `skip`.
pub fn hand_rig(skip: &[&str]) -> Rig {
    let mut bones = vec![RigBone::new("Wrist", None, Vec3::ZERO)];
    let fingers: [(&str, usize, f32); 5] = [
        ("Thumb", 3, -0.04),
        ("Index", 4, -0.02),
        ("Middle", 4, 0.0),
        ("Ring", 4, 0.02),
        ("Pinky", 4, 0.04),
    ];

    for (finger, count, x) in fingers {
        let mut parent = 0;
        for segment in 1..=count {
            let name = format!("{finger}{segment}");
            if skip.contains(&name.as_str()) {
                continue;
            }
            let offset = if segment == 1 {
                Vec3::new(x, 0.08, 0.0)
            } else {
                Vec3::new(0.0, 0.03, 0.0)
            };
            bones.push(RigBone::new(name, Some(parent), offset));
            parent = bones.len() - 1;
        }
    }

    Rig::new("test-hand", bones)
}

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::SeqCst;

static RESOURCE_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

// Generates a unique identifier for swap chains, mirror textures and controllers
pub fn new_id() -> u32 {
    RESOURCE_ID_COUNTER.fetch_add(1, SeqCst)
}

// Returns the current wall clock time in milliseconds
pub fn timestamp() -> f64 {
    let now = time::OffsetDateTime::now_utc();
    now.unix_timestamp_nanos() as f64 * 1e-6
}

// Adapted from http://www.euclideanspace.com/maths/geometry/rotations/conversions/matrixToQuaternion/index.htm
// Takes the rotation part of a row-major 3x4 matrix, returns [x, y, z, w].
#[inline]
pub fn matrix_to_quat(m: &[[f32; 4]; 3]) -> [f32; 4] {
    let w = f32::max(0.0, 1.0 + m[0][0] + m[1][1] + m[2][2]).sqrt() * 0.5;
    let mut x = f32::max(0.0, 1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 0.5;
    let mut y = f32::max(0.0, 1.0 - m[0][0] + m[1][1] - m[2][2]).sqrt() * 0.5;
    let mut z = f32::max(0.0, 1.0 - m[0][0] - m[1][1] + m[2][2]).sqrt() * 0.5;

    x = copysign(x, m[2][1] - m[1][2]);
    y = copysign(y, m[0][2] - m[2][0]);
    z = copysign(z, m[1][0] - m[0][1]);

    [x, y, z, w]
}

#[inline]
pub fn copysign(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else {
        a.abs() * b.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn identity_matrix_gives_identity_quat() {
        let m = [[1.0, 0.0, 0.0, 5.0], [0.0, 1.0, 0.0, 6.0], [0.0, 0.0, 1.0, 7.0]];
        assert_eq!(matrix_to_quat(&m), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn yaw_matrix_gives_y_quat() {
        // 90 degrees around +Y
        let m = [[0.0, 0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 0.0], [-1.0, 0.0, 0.0, 0.0]];
        let q = matrix_to_quat(&m);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!(q[0].abs() < 1e-6);
        assert!((q[1] - half).abs() < 1e-6);
        assert!(q[2].abs() < 1e-6);
        assert!((q[3] - half).abs() < 1e-6);
    }
}

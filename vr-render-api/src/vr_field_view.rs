// The VRFieldOfView struct represents an asymmetric field of view as the
// tangents of the four half angles measured from the eye's view axis.
// All four values are unsigned magnitudes, as reported by the runtimes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRFieldOfView {
    pub up_tan: f32,
    pub down_tan: f32,
    pub left_tan: f32,
    pub right_tan: f32,
}

impl Default for VRFieldOfView {
    fn default() -> VRFieldOfView {
        VRFieldOfView {
            up_tan: 1.0,
            down_tan: 1.0,
            left_tan: 1.0,
            right_tan: 1.0,
        }
    }
}

impl VRFieldOfView {
    pub fn from_degrees(up: f32, down: f32, left: f32, right: f32) -> VRFieldOfView {
        VRFieldOfView {
            up_tan: up.to_radians().tan(),
            down_tan: down.to_radians().tan(),
            left_tan: left.to_radians().tan(),
            right_tan: right.to_radians().tan(),
        }
    }

    // Symmetric field of view with the given vertical angle and aspect ratio (width / height).
    pub fn symmetric(vertical_degrees: f32, aspect: f32) -> VRFieldOfView {
        let vertical = (vertical_degrees.to_radians() * 0.5).tan();
        let horizontal = vertical * aspect;
        VRFieldOfView {
            up_tan: vertical,
            down_tan: vertical,
            left_tan: horizontal,
            right_tan: horizontal,
        }
    }

    pub fn up_degrees(&self) -> f32 {
        self.up_tan.atan().to_degrees()
    }

    pub fn down_degrees(&self) -> f32 {
        self.down_tan.atan().to_degrees()
    }

    pub fn left_degrees(&self) -> f32 {
        self.left_tan.atan().to_degrees()
    }

    pub fn right_degrees(&self) -> f32 {
        self.right_tan.atan().to_degrees()
    }

    pub fn horizontal_tan(&self) -> f32 {
        self.left_tan + self.right_tan
    }

    pub fn vertical_tan(&self) -> f32 {
        self.up_tan + self.down_tan
    }
}

#[cfg(test)]
mod tests {
    use super::VRFieldOfView;

    #[test]
    fn degrees_round_trip_through_tangents() {
        let fov = VRFieldOfView::from_degrees(45.0, 40.0, 50.0, 35.0);
        assert!((fov.up_tan - 1.0).abs() < 1e-5);
        assert!((fov.down_degrees() - 40.0).abs() < 1e-3);
        assert!((fov.left_degrees() - 50.0).abs() < 1e-3);
        assert!((fov.right_degrees() - 35.0).abs() < 1e-3);
    }

    #[test]
    fn symmetric_fov_scales_horizontal_by_aspect() {
        let fov = VRFieldOfView::symmetric(90.0, 2.0);
        assert!((fov.up_tan - 1.0).abs() < 1e-5);
        assert!((fov.left_tan - 2.0).abs() < 1e-5);
        assert!((fov.horizontal_tan() - 4.0).abs() < 1e-5);
    }
}

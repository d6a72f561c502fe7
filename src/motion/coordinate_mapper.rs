use super::Landmark;

/// Scales camera coordinates to fill the screen, cropping the overflow evenly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    scale: f32,
    x_offset: f32,
    y_offset: f32,
}

impl CoordinateMapper {
    pub fn new(camera_width: f32, camera_height: f32, screen_width: f32, screen_height: f32) -> Self {
        let scale = f32::max(screen_width / camera_width, screen_height / camera_height);
        Self {
            scale,
            x_offset: (screen_width - camera_width * scale) / 2.0,
            y_offset: (screen_height - camera_height * scale) / 2.0,
        }
    }

    pub fn transpose_x(&self, x: f32) -> f32 {
        self.x_offset + x * self.scale
    }

    pub fn transpose_y(&self, y: f32) -> f32 {
        self.y_offset + y * self.scale
    }

    pub fn map(&self, landmark: &Landmark) -> (f32, f32) {
        (self.transpose_x(landmark.x), self.transpose_y(landmark.y))
    }
}

use eframe::egui::{Vec2, vec2};

/// Allowed camera scale range.
pub const ZOOM_EXTENT: (f32, f32) = (0.2, 4.0);

const MIN_FIT_BOX: f32 = 40.0;
const FIT_PADDING: f32 = 0.8;
const TRANSITION_SECONDS: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |bounds, point| Self {
                min: bounds.min.min(point),
                max: bounds.max.max(point),
            },
        ))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Grows each side to at least `min_side`, keeping the center.
    pub fn floored(&self, min_side: f32) -> Self {
        let center = self.center();
        let half = self.size().max(Vec2::splat(min_side)) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Maps world coordinates to viewport-local coordinates:
/// `local = translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.translate + world * self.scale
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.translate) / self.scale
    }

    /// Scales by `factor` while keeping the world point under `pointer` fixed.
    pub fn zoom_about(&mut self, pointer: Vec2, factor: f32) {
        let world = self.screen_to_world(pointer);
        self.scale = (self.scale * factor).clamp(ZOOM_EXTENT.0, ZOOM_EXTENT.1);
        self.translate = pointer - world * self.scale;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }
}

/// Camera that frames `bounds` inside a viewport of `viewport` size.
pub fn fit_camera(bounds: BoundingBox, viewport: Vec2) -> Camera {
    let bounds = bounds.floored(MIN_FIT_BOX);
    let size = bounds.size();
    let viewport = viewport.max(Vec2::splat(1.0));

    let scale = (FIT_PADDING / (size.x / viewport.x).max(size.y / viewport.y))
        .clamp(ZOOM_EXTENT.0, ZOOM_EXTENT.1);

    Camera {
        translate: viewport * 0.5 - bounds.center() * scale,
        scale,
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
    from: Camera,
    to: Camera,
    started_at: f64,
}

impl CameraTransition {
    pub fn new(from: Camera, to: Camera, started_at: f64) -> Self {
        Self {
            from,
            to,
            started_at,
        }
    }

    /// Camera at time `now` and whether the transition has finished.
    pub fn sample(&self, now: f64) -> (Camera, bool) {
        let t = ((now - self.started_at) / TRANSITION_SECONDS).clamp(0.0, 1.0) as f32;
        if t >= 1.0 {
            return (self.to, true);
        }

        let eased = ease_cubic_in_out(t);
        let camera = Camera {
            translate: self.from.translate + (self.to.translate - self.from.translate) * eased,
            scale: self.from.scale + (self.to.scale - self.from.scale) * eased,
        };
        (camera, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn single_point_box_is_floored() {
        let bounds = BoundingBox::from_points([vec2(100.0, 50.0)]).unwrap();
        let floored = bounds.floored(MIN_FIT_BOX);
        assert_eq!(floored.size(), vec2(40.0, 40.0));
        assert_eq!(floored.center(), vec2(100.0, 50.0));

        let camera = fit_camera(bounds, vec2(800.0, 600.0));
        assert!(camera.scale.is_finite());
        assert_eq!(camera.scale, ZOOM_EXTENT.1);
        assert!(approx(camera.world_to_screen(vec2(100.0, 50.0)), vec2(400.0, 300.0)));
    }

    #[test]
    fn fit_uses_the_tighter_axis() {
        let bounds = BoundingBox::from_points([vec2(0.0, 0.0), vec2(400.0, 100.0)]).unwrap();
        let camera = fit_camera(bounds, vec2(800.0, 600.0));
        assert!((camera.scale - 1.6).abs() < 1e-5);
        assert!(approx(camera.world_to_screen(bounds.center()), vec2(400.0, 300.0)));

        let huge = BoundingBox::from_points([vec2(0.0, 0.0), vec2(100_000.0, 10.0)]).unwrap();
        assert_eq!(fit_camera(huge, vec2(800.0, 600.0)).scale, ZOOM_EXTENT.0);
    }

    #[test]
    fn empty_points_have_no_box() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn zoom_keeps_pointer_anchored_and_clamps() {
        let mut camera = Camera::default();
        let pointer = vec2(120.0, 80.0);
        let world = camera.screen_to_world(pointer);

        camera.zoom_about(pointer, 2.0);
        assert_eq!(camera.scale, 2.0);
        assert!(approx(camera.world_to_screen(world), pointer));

        camera.zoom_about(pointer, 100.0);
        assert_eq!(camera.scale, ZOOM_EXTENT.1);
        camera.zoom_about(pointer, 0.0001);
        assert_eq!(camera.scale, ZOOM_EXTENT.0);
    }

    #[test]
    fn transition_hits_both_ends() {
        let from = Camera::default();
        let to = Camera {
            translate: vec2(100.0, -50.0),
            scale: 2.0,
        };
        let transition = CameraTransition::new(from, to, 10.0);

        assert_eq!(transition.sample(10.0), (from, false));
        let (middle, done) = transition.sample(10.375);
        assert!(!done);
        assert!((middle.scale - 1.5).abs() < 1e-5);
        assert_eq!(transition.sample(10.75), (to, true));
        assert_eq!(transition.sample(99.0), (to, true));
    }
}

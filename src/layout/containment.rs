use eframe::egui::Vec2;

pub(super) fn clamp_to_circle(position: &mut Vec2, center: Vec2, radius: f32) -> bool {
    let offset = *position - center;
    let distance = offset.length();
    if distance <= radius || distance <= f32::EPSILON {
        return false;
    }

    *position = center + offset * (radius / distance);
    true
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn outside_point_lands_on_boundary_with_same_angle() {
        let center = vec2(400.0, 300.0);
        let mut position = vec2(400.0 + 300.0, 300.0 + 400.0);
        assert!(clamp_to_circle(&mut position, center, 220.0));

        let offset = position - center;
        assert!((offset.length() - 220.0).abs() < 1e-3);
        assert!((offset.y / offset.x - 4.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn inside_point_is_untouched() {
        let mut position = vec2(10.0, 0.0);
        assert!(!clamp_to_circle(&mut position, Vec2::ZERO, 220.0));
        assert_eq!(position, vec2(10.0, 0.0));
    }
}

use nalgebra::Vector2;

pub fn clamp(n: f32, min: f32, max: f32) -> f32 {
    n.min(max).max(min)
}

/// Splits a magnitude along `angle` (radians) into x/y components.
pub fn polar_to_cartesian(magnitude: f32, angle: f32) -> Vector2<f32> {
    Vector2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

// hue: 0-360 degrees, saturation and value: 0-1
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    if s == 0.0 {
        return [v, v, v];
    }

    let h = (h / 60.0).rem_euclid(6.0);
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i as u32 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Fully saturated, fully bright RGBA color for `hue`. Channels never drop
/// below 1/255 so a body is never drawn pure black on the black backdrop.
pub fn hue_color(hue: f32) -> [f32; 4] {
    let [r, g, b] = hsv_to_rgb(hue, 1.0, 1.0);
    let floor = 1.0 / 255.0;
    [clamp(r, floor, 1.0), clamp(g, floor, 1.0), clamp(b, floor, 1.0), 1.0]
}

//! Line trace - collision probe для летящего weapon
//!
//! Architecture:
//! - Weapon не знает про physics engine: спрашивает `LineTracer`
//! - `TraceWorld` (Resource) - встроенный tracer по статичным поверхностям
//!   (плоскости + AABB), хост заполняет его геометрией уровня
//! - Trace = отрезок start → end, возвращает ближайший hit

use bevy::prelude::*;

/// Результат line trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Точка попадания (world space)
    pub location: Vec3,
    /// Нормаль поверхности (развёрнута навстречу trace)
    pub normal: Vec3,
    /// Доля отрезка до попадания (0..=1)
    pub fraction: f32,
}

/// Seam для collision queries
pub trait LineTracer {
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit>;
}

/// Статичная поверхность для TraceWorld
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceSurface {
    /// Бесконечная двусторонняя плоскость
    Plane { point: Vec3, normal: Vec3 },
    /// Axis-aligned box
    Box { min: Vec3, max: Vec3 },
}

impl TraceSurface {
    fn intersect(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        match *self {
            TraceSurface::Plane { point, normal } => intersect_plane(start, end, point, normal),
            TraceSurface::Box { min, max } => intersect_box(start, end, min, max),
        }
    }
}

/// Встроенный tracer: набор статичных поверхностей уровня
#[derive(Resource, Debug, Clone, Default)]
pub struct TraceWorld {
    surfaces: Vec<TraceSurface>,
}

impl TraceWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plane(&mut self, point: Vec3, normal: Vec3) -> &mut Self {
        self.surfaces.push(TraceSurface::Plane {
            point,
            normal: normal.normalize_or_zero(),
        });
        self
    }

    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> &mut Self {
        self.surfaces.push(TraceSurface::Box {
            min: min.min(max),
            max: min.max(max),
        });
        self
    }

    pub fn surfaces(&self) -> &[TraceSurface] {
        &self.surfaces
    }
}

impl LineTracer for TraceWorld {
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        self.surfaces
            .iter()
            .filter_map(|surface| surface.intersect(start, end))
            .min_by(|a, b| a.fraction.total_cmp(&b.fraction))
    }
}

fn intersect_plane(start: Vec3, end: Vec3, point: Vec3, normal: Vec3) -> Option<TraceHit> {
    if normal == Vec3::ZERO {
        return None;
    }
    let segment = end - start;
    let denom = normal.dot(segment);
    if denom.abs() <= f32::EPSILON {
        return None; // параллельно плоскости
    }

    let fraction = normal.dot(point - start) / denom;
    if !(0.0..=1.0).contains(&fraction) {
        return None;
    }

    Some(TraceHit {
        location: start + segment * fraction,
        normal: if denom < 0.0 { normal } else { -normal },
        fraction,
    })
}

/// Slab test; trace изнутри box не считается попаданием
fn intersect_box(start: Vec3, end: Vec3, min: Vec3, max: Vec3) -> Option<TraceHit> {
    let segment = end - start;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let origin = start[axis];
        let delta = segment[axis];

        if delta.abs() <= f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / delta;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            let mut axis_normal = Vec3::ZERO;
            axis_normal[axis] = if delta > 0.0 { -1.0 } else { 1.0 };
            normal = axis_normal;
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if normal == Vec3::ZERO {
        return None;
    }

    Some(TraceHit {
        location: start + segment * t_enter,
        normal,
        fraction: t_enter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit_faces_tracer() {
        let mut world = TraceWorld::new();
        world.add_plane(Vec3::new(500.0, 0.0, 0.0), Vec3::NEG_X);

        let hit = world
            .line_trace(Vec3::new(450.0, 0.0, 0.0), Vec3::new(510.0, 0.0, 0.0))
            .expect("wall in range");
        assert!((hit.location - Vec3::new(500.0, 0.0, 0.0)).length() < 1e-3);
        assert_eq!(hit.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_plane_out_of_range() {
        let mut world = TraceWorld::new();
        world.add_plane(Vec3::new(500.0, 0.0, 0.0), Vec3::NEG_X);
        assert!(world
            .line_trace(Vec3::ZERO, Vec3::new(60.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_box_entry_face_normal() {
        let mut world = TraceWorld::new();
        world.add_box(Vec3::new(-50.0, -50.0, -100.0), Vec3::new(50.0, 50.0, 0.0));

        // Падение сверху на верхнюю грань
        let hit = world
            .line_trace(Vec3::new(0.0, 0.0, 30.0), Vec3::new(0.0, 0.0, -30.0))
            .expect("floor box hit");
        assert_eq!(hit.normal, Vec3::Z);
        assert!(hit.location.z.abs() < 1e-3);
    }

    #[test]
    fn test_nearest_surface_wins() {
        let mut world = TraceWorld::new();
        world
            .add_plane(Vec3::new(40.0, 0.0, 0.0), Vec3::NEG_X)
            .add_plane(Vec3::new(20.0, 0.0, 0.0), Vec3::NEG_X);

        let hit = world
            .line_trace(Vec3::ZERO, Vec3::new(60.0, 0.0, 0.0))
            .unwrap();
        assert!((hit.location.x - 20.0).abs() < 1e-3);
    }
}

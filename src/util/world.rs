use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict interior test, points on the border are outside
    pub fn contains(&self, p: DVec2) -> bool {
        self.x < p.x && p.x < self.x + self.width && self.y < p.y && p.y < self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub position: DVec2,
    pub radius: f64,
}

impl Goal {
    pub fn contains(&self, p: DVec2) -> bool {
        self.position.distance(p) < self.radius
    }
}

/// Static layout the dots move through
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Top-left corner of the world bounds
    #[serde(default)]
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    pub start: DVec2,
    pub goal: Goal,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
}

fn default_margin() -> f64 {
    2.0
}

impl World {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.width, self.height)
    }

    /// True when `p` lies within `margin` of any edge, or past it
    pub fn near_edge(&self, p: DVec2) -> bool {
        let min = self.origin + self.margin;
        let max = self.origin + DVec2::new(self.width, self.height) - self.margin;
        p.x < min.x || p.y < min.y || p.x > max.x || p.y > max.y
    }

    /// Index of the first obstacle containing `p`
    pub fn obstacle_at(&self, p: DVec2) -> Option<usize> {
        self.obstacles.iter().position(|r| r.contains(p))
    }
}

impl Default for World {
    fn default() -> Self {
        let (width, height) = (1600.0, 800.0);
        Self {
            origin: DVec2::ZERO,
            width,
            height,
            margin: default_margin(),
            start: DVec2::new(1520.0, 675.0),
            goal: Goal {
                position: DVec2::new(width / 2.0, 20.0),
                radius: 20.0,
            },
            obstacles: vec![
                Rect::new(0.0, 200.0, width / 2.5, 50.0),
                Rect::new(width / 2.0, 500.0, width, 50.0),
            ],
        }
    }
}

use crate::config::Tuning;
use crate::geometry::Rect;
use rand::Rng;

/// A top + bottom obstacle pair with a gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub(crate) x: f64,
    gap_center: i32,
    top_height: i32,
    bottom_y: i32,
    width: i32,
    field_height: f64,
    pub(crate) scored: bool,
}

impl Pipe {
    /// New pipe at `x` with a gap center drawn uniformly from the tuning's range.
    pub fn new<R: Rng>(x: f64, tuning: &Tuning, rng: &mut R) -> Self {
        let gap_center = rng.gen_range(tuning.gap_center_min..=tuning.gap_center_max);
        Self::with_gap(x, gap_center, tuning)
    }

    pub fn with_gap(x: f64, gap_center: i32, tuning: &Tuning) -> Self {
        Self {
            x,
            gap_center,
            top_height: gap_center.saturating_sub(tuning.gap_half),
            bottom_y: gap_center.saturating_add(tuning.gap_half),
            width: tuning.pipe_width,
            field_height: tuning.field_height,
            scored: false,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn gap_center(&self) -> i32 {
        self.gap_center
    }

    /// Height of the top obstacle, which is also the gap's upper edge.
    pub fn top_height(&self) -> i32 {
        self.top_height
    }

    /// Upper edge of the bottom obstacle, which is also the gap's lower edge.
    pub fn bottom_y(&self) -> i32 {
        self.bottom_y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    pub fn midpoint(&self) -> f64 {
        self.x + f64::from(self.width) / 2.0
    }

    pub fn update(&mut self, tuning: &Tuning) {
        self.x -= tuning.pipe_speed;
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(
            self.x,
            0.0,
            f64::from(self.width),
            f64::from(self.top_height),
        )
    }

    pub fn bottom_rect(&self) -> Rect {
        let top = f64::from(self.bottom_y);
        Rect::new(self.x, top, f64::from(self.width), self.field_height - top)
    }
}

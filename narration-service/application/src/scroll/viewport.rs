/// Vertical extent in the scroll container's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalSpan {
    pub top: f64,
    pub bottom: f64,
}

impl VerticalSpan {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// Whether `target` lies outside the band `margin` pixels inside `viewport`.
pub fn needs_scroll(target: VerticalSpan, viewport: VerticalSpan, margin: f64) -> bool {
    let safe_top = viewport.top + margin;
    let safe_bottom = viewport.bottom - margin;
    if safe_top >= safe_bottom {
        return target.top < viewport.top || target.bottom > viewport.bottom;
    }
    target.top < safe_top || target.bottom > safe_bottom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_inside_safe_band_stays_put() {
        let viewport = VerticalSpan::new(0.0, 600.0);
        assert!(!needs_scroll(VerticalSpan::new(200.0, 224.0), viewport, 80.0));
    }

    #[test]
    fn token_near_edges_needs_scroll() {
        let viewport = VerticalSpan::new(0.0, 600.0);
        assert!(needs_scroll(VerticalSpan::new(40.0, 64.0), viewport, 80.0));
        assert!(needs_scroll(VerticalSpan::new(540.0, 564.0), viewport, 80.0));
        assert!(needs_scroll(VerticalSpan::new(900.0, 924.0), viewport, 80.0));
    }

    #[test]
    fn oversized_margin_falls_back_to_viewport_bounds() {
        let viewport = VerticalSpan::new(100.0, 200.0);
        assert!(!needs_scroll(VerticalSpan::new(120.0, 140.0), viewport, 80.0));
        assert!(needs_scroll(VerticalSpan::new(90.0, 110.0), viewport, 80.0));
    }
}

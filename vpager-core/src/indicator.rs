//! Page indicator layout.
//!
//! Everything here is a pure function of page count, scroll position and
//! style. Up to `window_slots` pages every page gets an evenly spaced dot.
//! Above that the condensed layout shows a sliding window centered on the
//! current page. Dots shrink and fade with distance from the center, and the
//! whole window shifts continuously with the drag fraction.

use serde::Serialize;

use vpager_config::constants::indicator::{self as consts, alpha};
use vpager_config::{
    Color, HorizontalAnchor, IndicatorKind, IndicatorLayout, IndicatorMount,
    IndicatorPlacement, IndicatorStyle, VerticalAnchor,
};

/// Normalized distance past which dots are drawn at the minimum radius.
const FAR_THRESHOLD: f32 = 0.8;
/// Normalized distance past which dots are drawn slightly reduced.
const MID_THRESHOLD: f32 = 0.5;
const MID_SCALE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Area the dots are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub orientation: IndicatorKind,
}

impl Viewport {
    pub fn new(size: Size, orientation: IndicatorKind) -> Self {
        Self {
            width: size.width,
            height: size.height,
            orientation,
        }
    }

    fn main_extent(&self) -> f32 {
        match self.orientation {
            IndicatorKind::Vertical => self.height,
            IndicatorKind::Horizontal => self.width,
        }
    }

    fn cross_center(&self) -> f32 {
        match self.orientation {
            IndicatorKind::Vertical => self.width / 2.0,
            IndicatorKind::Horizontal => self.height / 2.0,
        }
    }

    /// Map (main, cross) to (x, y).
    fn point(&self, main: f32, cross: f32) -> (f32, f32) {
        match self.orientation {
            IndicatorKind::Vertical => (cross, main),
            IndicatorKind::Horizontal => (main, cross),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dot {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: u8,
    pub color: Color,
    pub active: bool,
}

impl Dot {
    /// Color to fill with: the dot's color with its alpha replaced.
    pub fn paint(&self) -> Color {
        self.color.with_alpha(self.alpha)
    }
}

fn is_condensed(page_count: usize, style: &IndicatorStyle) -> bool {
    style.layout == IndicatorLayout::Condensed && page_count > style.window_slots
}

/// Lay out the dots for `page_count` pages with `current_page` selected and
/// the drag `fraction` of the way towards the next page.
pub fn render(
    page_count: usize,
    current_page: usize,
    fraction: f32,
    style: &IndicatorStyle,
    viewport: Viewport,
) -> Vec<Dot> {
    if page_count == 0 {
        return Vec::new();
    }
    let current_page = current_page.min(page_count - 1);

    if is_condensed(page_count, style) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        render_condensed(page_count, current_page, fraction, style, viewport)
    } else {
        render_full(page_count, current_page, style, viewport)
    }
}

fn render_full(
    page_count: usize,
    current_page: usize,
    style: &IndicatorStyle,
    viewport: Viewport,
) -> Vec<Dot> {
    let n = page_count as f32;
    let active = style.active_dot_size;
    let total = active * 2.0 * n + style.dot_spacing * (n - 1.0);
    let start = (viewport.main_extent() - total) / 2.0 + active;
    let cross = viewport.cross_center();

    (0..page_count)
        .map(|page| {
            let is_current = page == current_page;
            let (x, y) =
                viewport.point(start + page as f32 * style.stride(), cross);
            Dot {
                page,
                x,
                y,
                radius: if is_current {
                    active
                } else {
                    style.normal_dot_size
                },
                alpha: if is_current {
                    alpha::ACTIVE
                } else {
                    alpha::FULL_INACTIVE
                },
                color: if is_current {
                    style.active_color
                } else {
                    style.inactive_color
                },
                active: is_current,
            }
        })
        .collect()
}

fn render_condensed(
    page_count: usize,
    current_page: usize,
    fraction: f32,
    style: &IndicatorStyle,
    viewport: Viewport,
) -> Vec<Dot> {
    let stride = style.stride();
    let half = style.window_slots / 2;
    let extent = viewport.main_extent();
    let center = extent / 2.0;
    let cross = viewport.cross_center();
    let scroll = -fraction * stride;
    let margin = style.active_dot_size * 2.0;
    let max_distance = style.window_slots as f32 / 2.0 * stride;

    // One extra page behind and two ahead so dots can slide fully in or out.
    let first = current_page.saturating_sub(half + 1);
    let last = (current_page + half + 2).min(page_count - 1);

    let mut dots = Vec::with_capacity(last - first + 1);
    for page in first..=last {
        let relative = page as f32 - current_page as f32;
        let pos = center + relative * stride + scroll;
        if pos < -margin || pos > extent + margin {
            continue;
        }

        let is_current = page == current_page;
        let (radius, dot_alpha) = if is_current {
            (style.active_dot_size, alpha::ACTIVE)
        } else {
            let distance = ((pos - center).abs() / max_distance).min(1.0);
            if distance > FAR_THRESHOLD {
                (style.min_dot_size, alpha::FAR)
            } else if distance > MID_THRESHOLD {
                (style.normal_dot_size * MID_SCALE, alpha::MID)
            } else {
                (style.normal_dot_size, alpha::NEAR)
            }
        };

        let (x, y) = viewport.point(pos, cross);
        dots.push(Dot {
            page,
            x,
            y,
            radius,
            alpha: dot_alpha,
            color: if is_current {
                style.active_color
            } else {
                style.inactive_color
            },
            active: is_current,
        });
    }
    dots
}

/// Size the indicator asks for when showing `page_count` pages.
pub fn preferred_size(
    page_count: usize,
    style: &IndicatorStyle,
    orientation: IndicatorKind,
) -> Size {
    let visible = if is_condensed(page_count, style) {
        style.window_slots
    } else {
        page_count
    };
    let cross = style.active_dot_size * 2.0 + consts::CROSS_AXIS_PADDING;
    let main = style.active_dot_size * 2.0 * visible as f32
        + style.dot_spacing * visible.saturating_sub(1) as f32
        + consts::MAIN_AXIS_PADDING;

    match orientation {
        IndicatorKind::Vertical => Size::new(cross, main),
        IndicatorKind::Horizontal => Size::new(main, cross),
    }
}

/// Top-left corner of an indicator of `size` placed inside `bounds`.
pub fn place(placement: IndicatorPlacement, bounds: Size, size: Size) -> (f32, f32) {
    let x = match placement.horizontal {
        HorizontalAnchor::Left(margin) => margin as f32,
        HorizontalAnchor::Right(margin) => bounds.width - size.width - margin as f32,
        HorizontalAnchor::Center => (bounds.width - size.width) / 2.0,
    };
    let y = match placement.vertical {
        VerticalAnchor::Top(margin) => margin as f32,
        VerticalAnchor::Bottom(margin) => {
            bounds.height - size.height - margin as f32
        }
    };
    (x, y)
}

/// A fully laid out indicator, ready to draw. Dot coordinates are relative to
/// `origin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorFrame {
    pub origin: (f32, f32),
    pub size: Size,
    pub kind: IndicatorKind,
    pub dots: Vec<Dot>,
}

impl IndicatorFrame {
    pub fn layout(
        page_count: usize,
        position: usize,
        fraction: f32,
        style: &IndicatorStyle,
        mount: IndicatorMount,
        bounds: Size,
    ) -> Self {
        let size = preferred_size(page_count, style, mount.kind);
        let origin = place(mount.placement, bounds, size);
        let dots = render(
            page_count,
            position,
            fraction,
            style,
            Viewport::new(size, mount.kind),
        );
        Self {
            origin,
            size,
            kind: mount.kind,
            dots,
        }
    }

    pub fn active_dot(&self) -> Option<&Dot> {
        self.dots.iter().find(|dot| dot.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(height: f32) -> Viewport {
        Viewport {
            width: 32.0,
            height,
            orientation: IndicatorKind::Vertical,
        }
    }

    #[test]
    fn no_pages_no_dots() {
        let style = IndicatorStyle::default();
        assert!(render(0, 0, 0.0, &style, vertical(400.0)).is_empty());
    }

    #[test]
    fn full_layout_has_one_dot_per_page() {
        let style = IndicatorStyle::default();
        for n in 1..=9 {
            let dots = render(n, 0, 0.0, &style, vertical(400.0));
            assert_eq!(dots.len(), n);
        }
    }

    #[test]
    fn full_layout_is_centered() {
        let style = IndicatorStyle::default();
        let dots = render(3, 1, 0.0, &style, vertical(400.0));

        // total = 8*2*3 + 16*2 = 80, start = (400 - 80) / 2 + 8 = 168
        let ys: Vec<f32> = dots.iter().map(|d| d.y).collect();
        assert_eq!(ys, vec![168.0, 200.0, 232.0]);
        assert!(dots.iter().all(|d| d.x == 16.0));

        assert_eq!(dots[1].radius, 8.0);
        assert_eq!(dots[1].alpha, 255);
        assert_eq!(dots[1].color, style.active_color);
        assert_eq!(dots[0].radius, 6.0);
        assert_eq!(dots[0].alpha, 153);
        assert_eq!(dots[0].color, style.inactive_color);
    }

    #[test]
    fn horizontal_lays_dots_along_x() {
        let style = IndicatorStyle::default();
        let viewport = Viewport {
            width: 400.0,
            height: 32.0,
            orientation: IndicatorKind::Horizontal,
        };
        let dots = render(3, 0, 0.0, &style, viewport);
        assert_eq!(dots[0].x, 168.0);
        assert!(dots.iter().all(|d| d.y == 16.0));
    }

    #[test]
    fn condensed_window_centers_current_page() {
        let style = IndicatorStyle::default();
        let viewport = vertical(400.0);
        let dots = render(100, 50, 0.0, &style, viewport);

        let active = dots.iter().find(|d| d.active).unwrap();
        assert_eq!(active.page, 50);
        assert_eq!(active.y, 200.0);
        assert_eq!(active.radius, style.active_dot_size);
        assert_eq!(active.alpha, 255);

        assert!(dots.iter().all(|d| (45..=56).contains(&d.page)));
        assert!(!dots.is_empty());
    }

    #[test]
    fn condensed_dots_fade_with_distance() {
        let style = IndicatorStyle::default();
        let dots = render(100, 50, 0.0, &style, vertical(400.0));
        let by_page = |p: usize| dots.iter().find(|d| d.page == p).unwrap();

        // stride 32, max distance 144
        let near = by_page(51); // 32 / 144 = 0.22
        assert_eq!((near.radius, near.alpha), (6.0, 204));
        let mid = by_page(53); // 96 / 144 = 0.67
        assert_eq!((mid.radius, mid.alpha), (style.normal_dot_size * 0.8, 180));
        let far = by_page(55); // 160 / 144 -> 1.0
        assert_eq!((far.radius, far.alpha), (3.0, 128));
    }

    #[test]
    fn condensed_window_slides_with_fraction() {
        let style = IndicatorStyle::default();
        let dots = render(100, 50, 0.5, &style, vertical(400.0));
        let active = dots.iter().find(|d| d.active).unwrap();
        assert_eq!(active.y, 184.0);
        let next = dots.iter().find(|d| d.page == 51).unwrap();
        assert_eq!(next.y, 216.0);
    }

    #[test]
    fn condensed_skips_offscreen_dots() {
        let style = IndicatorStyle::default();
        // Main extent 100: center 50, margin 16, so only |pos - 50| <= 66.
        let dots = render(100, 50, 0.0, &style, vertical(100.0));
        let pages: Vec<usize> = dots.iter().map(|d| d.page).collect();
        assert_eq!(pages, vec![48, 49, 50, 51, 52]);
    }

    #[test]
    fn condensed_window_clamps_at_the_start() {
        let style = IndicatorStyle::default();
        let dots = render(30, 0, 0.0, &style, vertical(1000.0));
        assert_eq!(dots.first().map(|d| d.page), Some(0));
        assert_eq!(dots.last().map(|d| d.page), Some(6));
    }

    #[test]
    fn full_layout_can_be_forced() {
        let style = IndicatorStyle {
            layout: IndicatorLayout::Full,
            ..Default::default()
        };
        assert_eq!(render(20, 3, 0.4, &style, vertical(800.0)).len(), 20);
    }

    #[test]
    fn active_dot_is_always_full_size() {
        let style = IndicatorStyle::default();
        for (count, current) in [(1, 0), (5, 4), (9, 8), (10, 0), (10, 9), (200, 120)] {
            let dots = render(count, current, 0.3, &style, vertical(600.0));
            let active = dots.iter().find(|d| d.active).unwrap();
            assert_eq!(active.page, current);
            assert_eq!(active.radius, style.active_dot_size);
            assert_eq!(active.alpha, 255);
        }
    }

    #[test]
    fn preferred_size_caps_at_window() {
        let style = IndicatorStyle::default();
        let three = preferred_size(3, &style, IndicatorKind::Vertical);
        assert_eq!(three, Size::new(32.0, 48.0 + 32.0 + 40.0));

        let many = preferred_size(50, &style, IndicatorKind::Vertical);
        assert_eq!(many.height, 16.0 * 9.0 + 16.0 * 8.0 + 40.0);

        let flipped = preferred_size(3, &style, IndicatorKind::Horizontal);
        assert_eq!(flipped, Size::new(three.height, three.width));
    }

    #[test]
    fn forced_full_layout_fits_its_preferred_size() {
        let style = IndicatorStyle {
            layout: IndicatorLayout::Full,
            ..Default::default()
        };
        let size = preferred_size(20, &style, IndicatorKind::Vertical);
        assert_eq!(size.height, 16.0 * 20.0 + 16.0 * 19.0 + 40.0);

        let dots = render(20, 7, 0.0, &style, Viewport::new(size, IndicatorKind::Vertical));
        assert_eq!(dots.len(), 20);
        for dot in &dots {
            assert!(dot.y - dot.radius >= 0.0, "dot {} starts at {}", dot.page, dot.y);
            assert!(
                dot.y + dot.radius <= size.height,
                "dot {} ends at {}",
                dot.page,
                dot.y + dot.radius
            );
        }
    }

    #[test]
    fn placement_anchors() {
        let bounds = Size::new(400.0, 800.0);
        let size = Size::new(32.0, 120.0);

        let default = place(IndicatorPlacement::default(), bounds, size);
        assert_eq!(default, (184.0, 640.0));

        let pinned = place(
            IndicatorPlacement {
                horizontal: HorizontalAnchor::Right(16),
                vertical: VerticalAnchor::Top(24),
            },
            bounds,
            size,
        );
        assert_eq!(pinned, (352.0, 24.0));
    }

    #[test]
    fn dot_paint_replaces_alpha() {
        let style = IndicatorStyle::default();
        let dots = render(2, 0, 0.0, &style, vertical(100.0));
        assert_eq!(dots[1].paint(), Color::from_argb(153, 0xFF, 0xFF, 0xFF));
    }
}

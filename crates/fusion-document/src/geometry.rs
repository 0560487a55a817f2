// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fit-and-centre placement of a raster image on a page.

/// Where a scaled image lands on its page, in PDF points from the
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale an image of `image_w` x `image_h` pixels uniformly so it fits the
/// page, then centre it.
///
/// `scale = min(page_w / image_w, page_h / image_h)`. The image always touches
/// one pair of opposite page edges. Returns `None` when any dimension is zero
/// or not finite.
pub fn fit_and_center(page_w: f64, page_h: f64, image_w: u32, image_h: u32) -> Option<Placement> {
    if image_w == 0 || image_h == 0 {
        return None;
    }
    if !(page_w.is_finite() && page_h.is_finite()) || page_w <= 0.0 || page_h <= 0.0 {
        return None;
    }

    let image_w = f64::from(image_w);
    let image_h = f64::from(image_h);

    let scale = (page_w / image_w).min(page_h / image_h);
    let width = image_w * scale;
    let height = image_h * scale;

    Some(Placement {
        scale,
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_fits(page_w: f64, page_h: f64, image_w: u32, image_h: u32) {
        let p = fit_and_center(page_w, page_h, image_w, image_h).expect("placement");
        let expected = (page_w / image_w as f64).min(page_h / image_h as f64);
        assert_eq!(p.scale, expected);
        assert!(p.x >= -EPS && p.y >= -EPS, "{p:?}");
        assert!(p.x + p.width <= page_w + EPS, "{p:?}");
        assert!(p.y + p.height <= page_h + EPS, "{p:?}");

        let touches_sides = (p.width - page_w).abs() < EPS;
        let touches_top_bottom = (p.height - page_h).abs() < EPS;
        assert!(touches_sides || touches_top_bottom, "{p:?}");
    }

    #[test]
    fn landscape_image_on_letter() {
        let p = fit_and_center(612.0, 792.0, 800, 600).expect("placement");
        assert!((p.scale - 0.765).abs() < EPS);
        assert!((p.width - 612.0).abs() < EPS);
        assert!((p.height - 459.0).abs() < EPS);
        assert!(p.x.abs() < EPS);
        assert!((p.y - 166.5).abs() < EPS);
    }

    #[test]
    fn small_image_is_enlarged_to_fit() {
        let p = fit_and_center(612.0, 792.0, 100, 100).expect("placement");
        assert!((p.scale - 6.12).abs() < EPS);
        assert!((p.y - 90.0).abs() < EPS);
    }

    #[test]
    fn fit_holds_across_shapes() {
        let pages = [(612.0, 792.0), (595.28, 841.89), (792.0, 612.0), (1.0, 1000.0)];
        let images = [
            (1, 1),
            (800, 600),
            (600, 800),
            (4000, 3),
            (3, 4000),
            (612, 792),
            (1224, 1584),
        ];
        for (pw, ph) in pages {
            for (iw, ih) in images {
                assert_fits(pw, ph, iw, ih);
            }
        }
    }

    #[test]
    fn same_inputs_same_geometry() {
        let a = fit_and_center(612.0, 792.0, 1234, 567).expect("placement");
        let b = fit_and_center(612.0, 792.0, 1234, 567).expect("placement");
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        assert!(fit_and_center(612.0, 792.0, 0, 10).is_none());
        assert!(fit_and_center(612.0, 792.0, 10, 0).is_none());
        assert!(fit_and_center(0.0, 792.0, 10, 10).is_none());
        assert!(fit_and_center(f64::NAN, 792.0, 10, 10).is_none());
    }
}

// Canvas subdivision for the optimized layout. Each table group gets its own
// rectangle so groups cannot spill into each other.

use super::{RectF, SizeF};

/// One region per group. A single group takes the whole canvas minus
/// `padding`; more groups share a near-square grid with `padding` between
/// cells and around the edge.
pub fn allocate_group_regions(group_count: usize, canvas: SizeF, padding: f64) -> Vec<RectF> {
    match group_count {
        0 => Vec::new(),
        1 => vec![RectF::new(padding, padding, canvas.w - 2.0 * padding, canvas.h - 2.0 * padding)],
        n => {
            let cols = (n as f64).sqrt().ceil() as usize;
            let rows = n.div_ceil(cols);
            let cell_w = (canvas.w - (cols + 1) as f64 * padding) / cols as f64;
            let cell_h = (canvas.h - (rows + 1) as f64 * padding) / rows as f64;

            (0..n)
                .map(|i| {
                    let col = (i % cols) as f64;
                    let row = (i / cols) as f64;
                    RectF::new(
                        padding + col * (cell_w + padding),
                        padding + row * (cell_h + padding),
                        cell_w,
                        cell_h,
                    )
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: SizeF = SizeF { w: 1400.0, h: 1000.0 };

    #[test]
    fn test_no_groups() {
        assert!(allocate_group_regions(0, CANVAS, 100.0).is_empty());
    }

    #[test]
    fn test_single_group_takes_canvas() {
        let regions = allocate_group_regions(1, CANVAS, 100.0);
        assert_eq!(regions, vec![RectF::new(100.0, 100.0, 1200.0, 800.0)]);
    }

    #[test]
    fn test_four_groups_form_two_by_two() {
        let regions = allocate_group_regions(4, CANVAS, 100.0);
        assert_eq!(regions.len(), 4);

        // (1400 - 300) / 2, (1000 - 300) / 2
        assert_eq!(regions[0], RectF::new(100.0, 100.0, 550.0, 350.0));
        assert_eq!(regions[1], RectF::new(750.0, 100.0, 550.0, 350.0));
        assert_eq!(regions[2], RectF::new(100.0, 550.0, 550.0, 350.0));
        assert_eq!(regions[3], RectF::new(750.0, 550.0, 550.0, 350.0));

        for (i, a) in regions.iter().enumerate() {
            for b in &regions[i + 1..] {
                assert!(!a.touches_or_overlaps(b));
            }
        }
    }

    #[test]
    fn test_three_groups_leave_last_cell_empty() {
        let regions = allocate_group_regions(3, CANVAS, 100.0);
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[2].x, 100.0);
        assert!(regions[2].y > regions[0].bottom());
    }

    #[test]
    fn test_five_groups_use_three_columns() {
        let regions = allocate_group_regions(5, SizeF { w: 3000.0, h: 1000.0 }, 100.0);
        assert_eq!(regions[2].y, regions[0].y);
        assert_eq!(regions[3].x, regions[0].x);
        assert!(regions.iter().all(|r| r.right() <= 3000.0 - 100.0 + 1e-9));
    }
}

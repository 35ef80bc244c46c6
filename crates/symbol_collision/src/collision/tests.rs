//! Placement scenarios for the collision index
//!
//! Every scenario uses an 800x600 viewport with the default 100px padding and
//! an orthographic tile matrix, so tile pixel `(x, y)` lands on grid pixel
//! `(x + 100, y + 100)` with a perspective ratio of exactly 1.

use approx::assert_relative_eq;

use crate::core::config::CollisionConfig;
use crate::foundation::math::{Mat4, Point2};
use crate::layout::{AlongLineLayout, LineLabel};
use crate::projection::FrameTransform;
use crate::spatial::GridBox;

use super::*;

fn screen_matrix() -> Mat4 {
    #[rustfmt::skip]
    let matrix = Mat4::new(
        2.0 / 800.0, 0.0,          0.0, -1.0,
        0.0,         -2.0 / 600.0, 0.0, 1.0,
        0.0,         0.0,          1.0, 0.0,
        0.0,         0.0,          0.0, 1.0,
    );
    matrix
}

fn index_with(config: &CollisionConfig) -> CollisionIndex {
    CollisionIndex::new(FrameTransform::new(800.0, 600.0, 1.0), config)
}

fn index() -> CollisionIndex {
    index_with(&CollisionConfig::new())
}

/// Collision box that lands on the given grid rectangle
fn grid_box(x1: f32, y1: f32, x2: f32, y2: f32) -> CollisionBox {
    CollisionBox {
        anchor: Point2::new(x1 - 100.0, y1 - 100.0),
        x1: 0.0,
        y1: 0.0,
        x2: x2 - x1,
        y2: y2 - y1,
    }
}

fn place(index: &CollisionIndex, collision_box: &CollisionBox, allow_overlap: bool) -> PlacedBox {
    index.place_collision_box(collision_box, allow_overlap, 1.0, &screen_matrix(), |_| true)
}

fn assert_rect(rect: Option<GridBox>, x1: f32, y1: f32, x2: f32, y2: f32) {
    let rect = rect.expect("box should be placed");
    assert_relative_eq!(rect.x1, x1, epsilon = 1e-3);
    assert_relative_eq!(rect.y1, y1, epsilon = 1e-3);
    assert_relative_eq!(rect.x2, x2, epsilon = 1e-3);
    assert_relative_eq!(rect.y2, y2, epsilon = 1e-3);
}

#[test]
fn test_overlapping_box_in_padding_band() {
    let mut index = index();
    index.insert_collision_box(&GridBox::new(40.0, 40.0, 60.0, 60.0), false, 1, 0, 0);

    let candidate = CollisionBox {
        anchor: Point2::new(-50.0, -50.0),
        x1: -5.0,
        y1: -5.0,
        x2: 15.0,
        y2: 15.0,
    };

    let placed = place(&index, &candidate, false);
    assert_eq!(placed.rect, None);
    assert!(!placed.offscreen);

    // Accepted, but it lies in the padding band left of and above the viewport
    let placed = place(&index, &candidate, true);
    assert_rect(placed.rect, 45.0, 45.0, 65.0, 65.0);
    assert!(placed.offscreen);
}

#[test]
fn test_overlapping_box_inside_viewport() {
    let mut index = index();
    index.insert_collision_box(&GridBox::new(140.0, 140.0, 160.0, 160.0), false, 1, 0, 0);
    let candidate = grid_box(145.0, 145.0, 165.0, 165.0);

    assert_eq!(place(&index, &candidate, false).rect, None);

    let placed = place(&index, &candidate, true);
    assert_rect(placed.rect, 145.0, 145.0, 165.0, 165.0);
    assert!(!placed.offscreen);
}

#[test]
fn test_box_placement_is_idempotent() {
    let mut index = index();
    index.insert_collision_box(&GridBox::new(300.0, 300.0, 340.0, 320.0), false, 1, 0, 0);

    for candidate in [grid_box(200.0, 200.0, 240.0, 220.0), grid_box(310.0, 305.0, 350.0, 325.0)] {
        let first = place(&index, &candidate, false);
        let second = place(&index, &candidate, false);
        assert_eq!(first, second);
    }
}

#[test]
fn test_collision_groups_partition_blocking() {
    let config = CollisionConfig::new().with_cross_source_collisions(false);
    let mut groups = CollisionGroups::new(config.cross_source_collisions);
    let roads = groups.get("roads");
    let pois = groups.get("pois");

    let mut index = index_with(&config);
    index.insert_collision_box(&GridBox::new(200.0, 200.0, 260.0, 230.0), false, 1, 0, roads.id);

    let candidate = grid_box(220.0, 210.0, 280.0, 240.0);
    let matrix = screen_matrix();
    let same_group = index.place_collision_box(&candidate, false, 1.0, &matrix, |key| roads.admits(key));
    assert_eq!(same_group.rect, None);

    let other_group = index.place_collision_box(&candidate, false, 1.0, &matrix, |key| pois.admits(key));
    assert!(other_group.rect.is_some());
}

#[test]
fn test_placement_depends_on_insertion_order() {
    let a = grid_box(200.0, 200.0, 260.0, 230.0);
    let b = grid_box(230.0, 210.0, 290.0, 240.0);

    let run = |first: &CollisionBox, second: &CollisionBox| {
        let mut index = index();
        let placed = place(&index, first, false);
        let rect = placed.rect.expect("first candidate always fits");
        index.insert_collision_box(&rect, false, 1, 0, 0);
        place(&index, second, false)
    };

    assert_eq!(run(&a, &b).rect, None);
    assert_eq!(run(&b, &a).rect, None);
}

#[test]
fn test_offscreen_and_out_of_grid_boxes() {
    let index = index();

    // Entirely left of the padded grid: rejected, never reported offscreen
    let placed = place(&index, &grid_box(-60.0, 300.0, -20.0, 320.0), true);
    assert_eq!(placed, PlacedBox { rect: None, offscreen: false });

    // Straddles the right viewport edge
    let placed = place(&index, &grid_box(899.0, 300.0, 940.0, 320.0), true);
    assert!(placed.rect.is_some());
    assert!(!placed.offscreen);

    // Right of the viewport but still inside the padding
    let placed = place(&index, &grid_box(920.0, 300.0, 960.0, 320.0), true);
    assert!(placed.rect.is_some());
    assert!(placed.offscreen);
}

#[test]
fn test_text_pixel_ratio_scales_box() {
    let index = index();
    let candidate = CollisionBox {
        anchor: Point2::new(300.0, 200.0),
        x1: -10.0,
        y1: -5.0,
        x2: 10.0,
        y2: 5.0,
    };
    let placed = index.place_collision_box(&candidate, false, 2.0, &screen_matrix(), |_| true);
    assert_rect(placed.rect, 380.0, 290.0, 420.0, 310.0);
}

#[test]
fn test_ignored_placements_do_not_block() {
    let mut index = index();
    index.insert_collision_box(&GridBox::new(200.0, 200.0, 260.0, 230.0), true, 3, 9, 0);

    let placed = place(&index, &grid_box(210.0, 205.0, 250.0, 225.0), false);
    assert!(placed.rect.is_some());
    assert_eq!(index.ignored_grid().keys_len(), 1);
    assert!(index.grid().is_empty());
}

fn straight_line() -> [Point2; 2] {
    [Point2::new(100.0, 300.0), Point2::new(700.0, 300.0)]
}

/// Label anchored at tile (400, 300) on a horizontal line
fn line_label(line: &[Point2], first_glyph_offset: f32, last_glyph_offset: f32) -> LineLabel<'_> {
    LineLabel {
        anchor: Point2::new(400.0, 300.0),
        segment: 0,
        line,
        first_glyph_offset,
        last_glyph_offset,
    }
}

fn place_line(index: &CollisionIndex, label: LineLabel<'_>, allow_overlap: bool) -> PlacedCircles {
    let pos_matrix = screen_matrix();
    let label_plane = Mat4::identity();
    let placement = CirclePlacement {
        label,
        allow_overlap,
        font_size: 24.0,
        pos_matrix: &pos_matrix,
        label_plane_matrix: &label_plane,
        label_to_screen_matrix: None,
    };
    index.place_collision_circles(&placement, &AlongLineLayout, |_| true)
}

#[test]
fn test_circle_chain_covers_label() {
    let line = straight_line();
    let index = index();
    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);

    assert!(!placed.collision_detected);
    assert!(!placed.offscreen);
    assert_eq!(placed.circles.len(), 11);
    assert!(placed.debug_circles.is_empty());

    for (i, circle) in placed.circles.iter().enumerate() {
        assert_relative_eq!(circle.x, 400.0 + 20.0 * i as f32, epsilon = 1e-3);
        assert_relative_eq!(circle.y, 400.0, epsilon = 1e-3);
        assert_relative_eq!(circle.radius, 10.0);
        assert!(!circle.used);
    }
}

#[test]
fn test_circle_spacing_never_exceeds_diameter() {
    let line = straight_line();
    let index = index();
    let placed = place_line(&index, line_label(&line, -137.0, 151.0), false);
    assert!(!placed.circles.is_empty());

    for pair in placed.circles.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        assert!((dx * dx + dy * dy).sqrt() <= 2.0 * pair[0].radius + 1e-3);
    }
}

#[test]
fn test_circle_chain_is_clipped_to_padded_viewport() {
    let line = [Point2::new(-600.0, 300.0), Point2::new(700.0, 300.0)];
    let label = LineLabel {
        anchor: Point2::new(0.0, 300.0),
        segment: 0,
        line: &line,
        first_glyph_offset: -300.0,
        last_glyph_offset: 300.0,
    };
    let placed = place_line(&index(), label, false);

    assert!(placed.circles.len() >= 21);
    assert_relative_eq!(placed.circles[0].x, 0.0, epsilon = 1e-3);
    let last = placed.circles.last().unwrap();
    assert_relative_eq!(last.x, 400.0, epsilon = 1e-3);
}

fn gaps_wider_than_diameter(circles: &[PlacedCircle]) -> Vec<(PlacedCircle, PlacedCircle)> {
    let mut gaps = Vec::new();
    for pair in circles.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        if (dx * dx + dy * dy).sqrt() > 2.0 * pair[0].radius + 1e-3 {
            gaps.push((pair[0], pair[1]));
        }
    }
    gaps
}

#[test]
fn test_circle_chain_follows_bend() {
    let line = [Point2::new(100.0, 300.0), Point2::new(400.0, 300.0), Point2::new(400.0, 600.0)];
    let label = LineLabel {
        anchor: Point2::new(300.0, 300.0),
        segment: 0,
        line: &line,
        first_glyph_offset: -150.0,
        last_glyph_offset: 250.0,
    };
    let placed = place_line(&index(), label, false);

    // 250px before the corner, 150px after it; the corner circle is shared
    assert_eq!(placed.circles.len(), 22);
    assert!(gaps_wider_than_diameter(&placed.circles).is_empty());

    let corner = &placed.circles[13];
    assert_relative_eq!(corner.x, 500.0, epsilon = 1e-3);
    assert_relative_eq!(corner.y, 400.0, epsilon = 1e-3);
    let last = placed.circles.last().unwrap();
    assert_relative_eq!(last.x, 500.0, epsilon = 1e-3);
    assert_relative_eq!(last.y, 550.0, epsilon = 1e-3);
}

#[test]
fn test_circle_chain_restarts_where_line_reenters_viewport() {
    // Dips far above the viewport between x = 300 and x = 500
    let line = [
        Point2::new(200.0, 300.0),
        Point2::new(300.0, 300.0),
        Point2::new(400.0, -400.0),
        Point2::new(500.0, 300.0),
        Point2::new(600.0, 300.0),
    ];
    let label = LineLabel {
        anchor: Point2::new(250.0, 300.0),
        segment: 0,
        line: &line,
        first_glyph_offset: -40.0,
        last_glyph_offset: 1500.0,
    };
    let placed = place_line(&index(), label, false);
    assert_eq!(placed.circles.len(), 51);
    assert!(!placed.offscreen);

    // The only gap is the excursion past the top of the padded viewport
    let gaps = gaps_wider_than_diameter(&placed.circles);
    assert_eq!(gaps.len(), 1);
    let (exit, reentry) = gaps[0];
    assert_relative_eq!(exit.x, 400.0 + 400.0 / 7.0, epsilon = 1e-3);
    assert_relative_eq!(exit.y, 0.0, epsilon = 1e-3);
    assert_relative_eq!(reentry.x, 500.0 + 300.0 / 7.0, epsilon = 1e-3);
    assert_relative_eq!(reentry.y, 0.0, epsilon = 1e-3);
}

#[test]
fn test_circle_diameter_sets_radius_and_spacing() {
    let line = straight_line();
    let index = index_with(&CollisionConfig::new().with_circle_pixel_diameter(40.0));
    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);

    assert_eq!(placed.circles.len(), 6);
    for (i, circle) in placed.circles.iter().enumerate() {
        assert_relative_eq!(circle.x, 400.0 + 40.0 * i as f32, epsilon = 1e-3);
        assert_relative_eq!(circle.radius, 20.0);
    }
}

#[test]
fn test_anchor_behind_camera_places_nothing() {
    let line = straight_line();
    let index = index();
    // w = -4 gives a small positive perspective ratio of 0.375
    let mut pos_matrix = screen_matrix();
    pos_matrix[(3, 3)] = -4.0;
    let label_plane = Mat4::identity();
    let placement = CirclePlacement {
        label: line_label(&line, -100.0, 100.0),
        allow_overlap: false,
        font_size: 24.0,
        pos_matrix: &pos_matrix,
        label_plane_matrix: &label_plane,
        label_to_screen_matrix: None,
    };
    let placed = index.place_collision_circles(&placement, &AlongLineLayout, |_| true);
    assert_eq!(placed, PlacedCircles::default());
}

#[test]
fn test_colliding_chain_is_rejected() {
    let line = straight_line();
    let mut index = index();
    index.insert_collision_box(&GridBox::new(490.0, 390.0, 510.0, 410.0), false, 1, 0, 0);

    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);
    assert!(placed.circles.is_empty());
    assert!(placed.collision_detected);
    assert!(!placed.offscreen);
    assert!(placed.debug_circles.is_empty());

    let placed = place_line(&index, line_label(&line, -100.0, 100.0), true);
    assert_eq!(placed.circles.len(), 11);
}

#[test]
fn test_debug_circles_keep_scanning_after_collision() {
    let line = straight_line();
    let mut index = index_with(&CollisionConfig::new().with_collision_circles(true));
    index.insert_collision_box(&GridBox::new(390.0, 390.0, 410.0, 410.0), false, 1, 0, 0);

    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);
    assert!(placed.circles.is_empty());
    assert!(placed.collision_detected);
    assert_eq!(placed.debug_circles.len(), 11);
}

#[test]
fn test_label_that_does_not_fit_is_empty() {
    let line = straight_line();
    let placed = place_line(&index(), line_label(&line, -100.0, 400.0), false);
    assert_eq!(placed, PlacedCircles::default());
}

#[test]
fn test_pitched_label_reprojects_path() {
    let line = straight_line();
    let index = index();
    let pos_matrix = screen_matrix();
    let label_plane = Mat4::identity();
    let to_screen = Mat4::identity();
    let placement = CirclePlacement {
        label: line_label(&line, -100.0, 100.0),
        allow_overlap: false,
        font_size: 24.0,
        pos_matrix: &pos_matrix,
        label_plane_matrix: &label_plane,
        label_to_screen_matrix: Some(&to_screen),
    };
    let placed = index.place_collision_circles(&placement, &AlongLineLayout, |_| true);
    assert_eq!(placed.circles.len(), 11);

    let mut behind_camera = Mat4::identity();
    behind_camera[(3, 3)] = -1.0;
    let placement = CirclePlacement {
        label_to_screen_matrix: Some(&behind_camera),
        ..placement
    };
    let placed = index.place_collision_circles(&placement, &AlongLineLayout, |_| true);
    assert!(placed.circles.is_empty());
    assert!(!placed.collision_detected);
}

#[test]
fn test_inserted_circles_block_boxes() {
    let line = straight_line();
    let mut index = index();
    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);
    index.insert_collision_circles(&placed.circles, false, 2, 4, 0);
    assert_eq!(index.grid().keys_len(), 11);

    assert_eq!(place(&index, &grid_box(455.0, 395.0, 465.0, 405.0), false).rect, None);
    assert!(place(&index, &grid_box(455.0, 430.0, 465.0, 440.0), false).rect.is_some());
}

#[test]
fn test_query_rendered_symbols() {
    let mut index = index();
    index.insert_collision_box(&GridBox::new(140.0, 140.0, 160.0, 160.0), false, 1, 0, 0);
    index.insert_collision_box(&GridBox::new(150.0, 150.0, 180.0, 170.0), false, 1, 1, 0);
    index.insert_collision_box(&GridBox::new(145.0, 145.0, 155.0, 155.0), true, 2, 5, 0);
    index.insert_collision_box(&GridBox::new(600.0, 600.0, 620.0, 620.0), false, 1, 2, 0);

    let selection = [
        Point2::new(30.0, 30.0),
        Point2::new(90.0, 30.0),
        Point2::new(90.0, 90.0),
        Point2::new(30.0, 90.0),
    ];
    let result = index.query_rendered_symbols(&selection);
    assert_eq!(result.len(), 2);
    assert_eq!(result[&1], vec![0, 1]);
    assert_eq!(result[&2], vec![5]);

    assert_eq!(index.query_rendered_symbols(&selection), result);

    let click = index.query_rendered_symbols(&[Point2::new(75.0, 65.0)]);
    assert_eq!(click.len(), 1);
    assert_eq!(click[&1], vec![1]);
}

#[test]
fn test_query_reports_circle_chains_once() {
    let line = straight_line();
    let mut index = index();
    let placed = place_line(&index, line_label(&line, -100.0, 100.0), false);
    index.insert_collision_circles(&placed.circles, false, 7, 3, 0);

    let selection = [
        Point2::new(250.0, 280.0),
        Point2::new(450.0, 280.0),
        Point2::new(450.0, 320.0),
        Point2::new(250.0, 320.0),
    ];
    let result = index.query_rendered_symbols(&selection);
    assert_eq!(result[&7], vec![3]);
}

#[test]
fn test_query_short_circuits() {
    let mut index = index();
    assert!(index.query_rendered_symbols(&[Point2::new(10.0, 10.0)]).is_empty());

    index.insert_collision_box(&GridBox::new(100.0, 100.0, 120.0, 120.0), false, 1, 0, 0);
    assert!(index.query_rendered_symbols(&[]).is_empty());
}

#[test]
fn test_viewport_matrix_removes_padding() {
    let index = index();
    let point = index.viewport_matrix() * crate::foundation::math::Vec4::new(150.0, 250.0, 0.0, 1.0);
    assert_relative_eq!(point.x, 50.0);
    assert_relative_eq!(point.y, 150.0);
}

#[test]
fn test_grid_bounds() {
    let index = index();
    assert_eq!((index.grid().width(), index.grid().height()), (1000.0, 800.0));
    assert_eq!((index.ignored_grid().width(), index.ignored_grid().height()), (1000.0, 800.0));
    assert!(index.is_inside_grid(&GridBox::new(-10.0, -10.0, 0.0, 0.0)));
    assert!(!index.is_inside_grid(&GridBox::new(1000.0, 10.0, 1010.0, 20.0)));
    assert!(!index.is_inside_grid(&GridBox::new(10.0, 810.0, 20.0, 820.0)));
}

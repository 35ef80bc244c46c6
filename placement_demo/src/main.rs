//! Label placement demo
//!
//! Loads a scene file, places its labels in order against a pitched
//! perspective camera, and runs the scene's feature-picking queries.
//!
//! ```text
//! placement_demo [scene-file]
//! ```

mod camera;
mod scene;

use std::collections::BTreeMap;

use symbol_collision::collision::{CirclePlacement, CollisionBox, CollisionGroups, CollisionIndex};
use symbol_collision::config::{Config, ConfigError};
use symbol_collision::foundation::logging;
use symbol_collision::foundation::math::Point2;
use symbol_collision::layout::{AlongLineLayout, LineLabel};
use symbol_collision::projection::viewport_label_plane_matrix;

use camera::Camera;
use scene::{LabelConfig, LabelShape, Scene};

const DEFAULT_SCENE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/downtown.toml");

/// Errors that stop the demo
#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    /// Scene file could not be loaded or failed validation
    #[error("Scene configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Outcome of one placement pass
#[derive(Debug, Default)]
pub struct PlacementReport {
    /// Names of placed labels, in placement order
    pub placed: Vec<String>,
    /// Names of rejected labels, in placement order
    pub rejected: Vec<String>,
    /// Query results, one per scene query
    pub picks: Vec<BTreeMap<u32, Vec<u32>>>,
}

/// Place every label of a scene and run its queries
pub fn run_scene(scene: &Scene) -> Result<PlacementReport, DemoError> {
    scene.validate()?;

    let viewport = scene.viewport;
    let camera = Camera::from_config(&scene.camera, viewport.width / viewport.height);
    let pos_matrix = camera.pos_matrix();
    let transform = camera.frame_transform(viewport.width, viewport.height);
    let label_plane_matrix = viewport_label_plane_matrix(&pos_matrix, &transform);

    let mut index = CollisionIndex::new(transform, &scene.collision);
    let mut groups = CollisionGroups::new(scene.collision.cross_source_collisions);
    let mut report = PlacementReport::default();

    for label in &scene.labels {
        let group = groups.get(&label.source);
        let placed = match &label.shape {
            LabelShape::Point {
                anchor,
                size,
                text_scale,
            } => {
                let collision_box = CollisionBox {
                    anchor: Point2::new(anchor[0], anchor[1]),
                    x1: -size[0] / 2.0,
                    y1: -size[1] / 2.0,
                    x2: size[0] / 2.0,
                    y2: size[1] / 2.0,
                };
                let result = index.place_collision_box(
                    &collision_box,
                    label.allow_overlap,
                    *text_scale,
                    &pos_matrix,
                    |key| group.admits(key),
                );
                if let Some(rect) = result.rect {
                    index.insert_collision_box(
                        &rect,
                        label.ignore_placement,
                        label.bucket,
                        label.feature,
                        group.id,
                    );
                    log_placed(label, result.offscreen);
                    true
                } else {
                    false
                }
            }
            LabelShape::Line {
                line,
                anchor,
                segment,
                first_glyph_offset,
                last_glyph_offset,
                font_size,
            } => {
                let line: Vec<Point2> = line.iter().map(|p| Point2::new(p[0], p[1])).collect();
                let placement = CirclePlacement {
                    label: LineLabel {
                        anchor: Point2::new(anchor[0], anchor[1]),
                        segment: *segment,
                        line: &line,
                        first_glyph_offset: *first_glyph_offset,
                        last_glyph_offset: *last_glyph_offset,
                    },
                    allow_overlap: label.allow_overlap,
                    font_size: *font_size,
                    pos_matrix: &pos_matrix,
                    label_plane_matrix: &label_plane_matrix,
                    label_to_screen_matrix: None,
                };
                let result = index.place_collision_circles(&placement, &AlongLineLayout, |key| group.admits(key));
                if result.circles.is_empty() {
                    false
                } else {
                    index.insert_collision_circles(
                        &result.circles,
                        label.ignore_placement,
                        label.bucket,
                        label.feature,
                        group.id,
                    );
                    log_placed(label, result.offscreen);
                    log::debug!("  {} collision circles", result.circles.len());
                    true
                }
            }
        };

        if placed {
            report.placed.push(label.name.clone());
        } else {
            log::info!("Rejected '{}'", label.name);
            report.rejected.push(label.name.clone());
        }
    }

    for query in &scene.queries {
        let picked = index.query_rendered_symbols(&query.points());
        log::info!("Query '{}' picked {:?}", query.name, picked);
        report.picks.push(picked);
    }

    Ok(report)
}

fn log_placed(label: &LabelConfig, offscreen: bool) {
    if offscreen {
        log::info!("Placed '{}' (offscreen)", label.name);
    } else {
        log::info!("Placed '{}'", label.name);
    }
}

fn main() -> Result<(), DemoError> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SCENE.to_string());
    let scene = Scene::load_from_file(&path)?;
    logging::init_with_level(&scene.logging.log_level);

    log::info!("Loaded scene {} with {} labels", path, scene.labels.len());
    let report = run_scene(&scene)?;
    log::info!(
        "{} labels placed, {} rejected",
        report.placed.len(),
        report.rejected.len()
    );
    Ok(())
}

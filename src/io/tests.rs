// Loader tests against small on-disk run folders

use super::*;
use crate::error::AnalysisError;
use flate2::{write::GzEncoder, Compression};
use std::io::Write;
use tempfile::TempDir;

const PARAMS: &str = "# L, N, radius, BOX1_W, BOX2_W, BOX1_H\n\
0.050000 2 0.001500 0.090000 0.090000 0.090000\n";

const TRAJECTORY: &str = "# t\n\
# x y vx vy\n\
0.000000\n\
0.010000 0.020000 0.001000 0.000000\n\
0.030000 0.040000 0.000000 -0.001000\n\
0.100000\n\
0.010100 0.020000 0.001000 0.000000\n\
0.030000 0.039900 0.000000 -0.001000\n";

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn params_skip_comments_and_keep_integer_count() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "params.txt", PARAMS);
    let p = load_params(&path).unwrap();
    assert_eq!(p.particle_count, 2);
    assert!((p.channel_width - 0.05).abs() < 1e-12);
    assert!((p.radius - 0.0015).abs() < 1e-12);
    assert!((p.box1_height - 0.09).abs() < 1e-12);
}

#[test]
fn params_reject_wrong_token_count() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "params.txt", "# header\n0.05 2 0.0015 0.09\n");
    match load_params(&path) {
        Err(AnalysisError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn params_reject_fractional_particle_count() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "params.txt", "0.05 2.5 0.0015 0.09 0.09 0.09\n");
    assert!(matches!(load_params(&path), Err(AnalysisError::Parse { .. })));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.txt");
    match load_params(&path) {
        Err(AnalysisError::MissingFile(p)) => assert_eq!(p, path),
        other => panic!("expected missing file, got {:?}", other),
    }
}

#[test]
fn trajectory_groups_particles_under_time_lines() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "output.txt", TRAJECTORY);
    let traj = load_trajectory(&path, Some(2)).unwrap();
    assert_eq!(traj.len(), 2);
    assert_eq!(traj.particle_count(), 2);
    assert_eq!(traj.times(), vec![0.0, 0.1]);
    assert!((traj.frames[1].positions[1].y - 0.0399).abs() < 1e-12);
    assert!((traj.frames[0].velocities[1].y + 0.001).abs() < 1e-12);
}

#[test]
fn truncated_final_frame_is_dropped() {
    let dir = TempDir::new().unwrap();
    let content = format!("{}0.200000\n0.010200 0.020000 0.001000 0.000000\n", TRAJECTORY);
    let path = write(&dir, "output.txt", &content);
    let traj = load_trajectory(&path, Some(2)).unwrap();
    assert_eq!(traj.len(), 2);
}

#[test]
fn short_frame_in_the_middle_is_an_error() {
    let text = "0.0\n1 1 0 0\n2 2 0 0\n0.1\n1 1 0 0\n0.2\n1 1 0 0\n2 2 0 0\n";
    let err = Trajectory::parse(std::path::Path::new("output.txt"), text, None).unwrap_err();
    assert!(matches!(err, AnalysisError::FrameSize { frame: 1, expected: 2, found: 1 }));
}

#[test]
fn particle_line_without_time_is_an_error() {
    let text = "# x y vx vy\n1 1 0 0\n";
    let err = Trajectory::parse(std::path::Path::new("output.txt"), text, None).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { line: 2, .. }));
}

#[test]
fn collisions_parse_wall_kinds_and_sides() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bounce_wall_output.txt",
        "# box_id t vx vy wall\n1 0.5 0.01 -0.02 V\n2 1.5 0.03 0.04 C\n1 2.0 0.0 0.02 H\n",
    );
    let c = load_collisions(&path).unwrap();
    assert_eq!(c.len(), 3);
    assert_eq!(c[0].side, BoxSide::Left);
    assert_eq!(c[1].side, BoxSide::Right);
    assert_eq!(c[1].wall, WallKind::Corner);
    assert!((c[0].impulse() - 0.02).abs() < 1e-12);
    assert!((c[1].impulse() - 0.1).abs() < 1e-12);
    assert!((c[2].impulse() - 0.04).abs() < 1e-12);
}

#[test]
fn collisions_skip_unknown_boxes_and_reject_unknown_walls() {
    let ok = parse_collisions_str("3 0.5 0.01 0.0 V\n1 0.6 0.01 0.0 V\n").unwrap();
    assert_eq!(ok.len(), 1);

    let err = parse_collisions_str("1 0.5 0.01 0.0 X\n").unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { line: 1, .. }));
}

fn parse_collisions_str(text: &str) -> crate::error::Result<Vec<WallCollision>> {
    collisions::parse_collisions(std::path::Path::new("bounce_wall_output.txt"), text)
}

#[test]
fn gzip_sibling_is_read_transparently() {
    let dir = TempDir::new().unwrap();
    let gz_path = dir.path().join("output.txt.gz");
    let file = std::fs::File::create(&gz_path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::fast());
    encoder.write_all(TRAJECTORY.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let traj = load_trajectory(dir.path().join("output.txt"), Some(2)).unwrap();
    assert_eq!(traj.len(), 2);
}

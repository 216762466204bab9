//! File-based pipeline tests.

use std::fs;

use isosurf::{extract, Spacing, WeldMode};
use isosurf_io::{
    export_obj_to_file, normalize_grid, run_pipeline, stack_slices, AxisOrder, IoError,
    ObjExportConfig, PipelineConfig,
};

/// Bright ball in a dark volume, as 8-bit intensities, x fastest.
fn ball_volume(n: usize) -> Vec<u8> {
    let c = (n - 1) as f32 * 0.5;
    let r = n as f32 * 0.3;
    let mut bytes = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2) + (z as f32 - c).powi(2))
                    .sqrt();
                bytes.push(if d < r { 200 } else { 20 });
            }
        }
    }
    bytes
}

#[test]
fn should_run_raw_volume_to_obj() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ball.raw"), ball_volume(12)).unwrap();
    fs::write(
        dir.path().join("pipeline.toml"),
        r#"
            output = "ball.obj"
            weld = { mode = "exact" }
            normals = true

            [input]
            path = "ball.raw"
            dims = [12, 12, 12]
            spacing = [0.5, 0.5, 1.0]
            sample = "u8"
        "#,
    )
    .unwrap();

    let config = PipelineConfig::from_file(dir.path().join("pipeline.toml")).unwrap();
    assert_eq!(config.weld, WeldMode::Exact);

    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.dims, [12, 12, 12]);
    assert_eq!(report.value_range, Some((20.0, 200.0)));
    assert!(report.mesh.triangle_count > 0);
    assert!(report.mesh.vertex_count < report.mesh.triangle_count * 3);
    // z spacing is twice the in-plane spacing.
    assert!(report.mesh.bbox_max.z > 1.5 * report.mesh.bbox_max.x);

    let obj = fs::read_to_string(dir.path().join("ball.obj")).unwrap();
    assert!(obj.contains("# isovalue 0.5"));
    assert_eq!(
        obj.lines().filter(|l| l.starts_with("v ")).count(),
        report.mesh.vertex_count
    );
    assert_eq!(
        obj.lines().filter(|l| l.starts_with("vn ")).count(),
        report.mesh.vertex_count
    );
    assert_eq!(
        obj.lines().filter(|l| l.starts_with("f ")).count(),
        report.mesh.triangle_count
    );
}

#[test]
fn should_report_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PipelineConfig::from_toml_str(
        r#"
            output = "out.obj"
            [input]
            path = "/definitely/not/here.raw"
            dims = [4, 4, 4]
        "#,
    )
    .unwrap();
    config.output = dir.path().join("out.obj");

    assert!(matches!(run_pipeline(&config), Err(IoError::Io(_))));
    assert!(!config.output.exists());
}

#[test]
fn should_reject_truncated_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("short.raw");
    fs::write(&raw, vec![0u8; 60]).unwrap();

    let mut config = PipelineConfig::from_toml_str(
        r#"
            output = "out.obj"
            [input]
            path = "short.raw"
            dims = [4, 4, 4]
        "#,
    )
    .unwrap();
    config.input.path = raw;
    config.output = dir.path().join("out.obj");

    assert!(matches!(
        run_pipeline(&config),
        Err(IoError::RawSizeMismatch {
            expected: 64,
            got: 60
        })
    ));
}

#[test]
fn should_stack_normalize_extract_and_export_slices() {
    // Row-major 6x5 slices; a bright square occupies rows 1..=3, columns 1..=2
    // on the middle slices.
    let (height, width, depth) = (6, 5, 5);
    let slices: Vec<Vec<f32>> = (0..depth)
        .map(|k| {
            (0..height * width)
                .map(|i| {
                    let (row, col) = (i / width, i % width);
                    let inside = (1..=3).contains(&row)
                        && (1..=2).contains(&col)
                        && (1..=3).contains(&k);
                    if inside {
                        1500.0
                    } else {
                        -500.0
                    }
                })
                .collect()
        })
        .collect();

    let grid = stack_slices(
        &slices,
        height,
        width,
        AxisOrder::RowColumnSlice,
        Spacing::uniform(1.0),
    )
    .unwrap();
    let (grid, range) = normalize_grid(grid).unwrap();
    assert_eq!(range, (-500.0, 1500.0));

    let mesh = extract(&grid, 0.5).unwrap();
    let stats = mesh.stats();
    // x = row, y = column: the box spans rows 0.5..3.5 and columns 0.5..2.5.
    assert!((stats.bbox_min.x - 0.5).abs() < 1e-5);
    assert!((stats.bbox_max.x - 3.5).abs() < 1e-5);
    assert!((stats.bbox_min.y - 0.5).abs() < 1e-5);
    assert!((stats.bbox_max.y - 2.5).abs() < 1e-5);
    assert!((stats.bbox_min.z - 0.5).abs() < 1e-5);
    assert!((stats.bbox_max.z - 3.5).abs() < 1e-5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.obj");
    let written = export_obj_to_file(&mesh, &path, &ObjExportConfig::default()).unwrap();
    assert_eq!(written, stats);
    assert!(path.exists());
}

#[test]
fn should_fail_to_write_into_missing_directory() {
    let grid = isosurf::VoxelGrid::from_fn([3, 3, 3], Spacing::uniform(1.0), |p| p.x).unwrap();
    let mesh = extract(&grid, 0.5).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = export_obj_to_file(
        &mesh,
        dir.path().join("missing").join("out.obj"),
        &ObjExportConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Output { .. }));
}

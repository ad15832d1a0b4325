//! End-to-end scenarios: write synthetic trace files to disk, run the batch
//! analysis, and check totals, findings, and per-file failure containment.

use std::fs;
use std::path::PathBuf;

use d3d9trace::{
    DecodeOptions, DrawCall, DrawCallArgs, PrimitiveType, TraceWriter, TRACE_HEADER_SIZE,
};
use d3d9trace_analysis::{analyze_files, Finding};
use pretty_assertions::assert_eq;

fn triangle_draw(primitive_count: u32) -> DrawCall {
    DrawCall {
        primitive_type: PrimitiveType::TriangleList,
        has_state_delta: false,
        primitive_count,
        args: DrawCallArgs::Direct { start_vertex: 0 },
    }
}

fn up_draw(primitive_count: u32) -> DrawCall {
    DrawCall {
        primitive_type: PrimitiveType::TriangleList,
        has_state_delta: false,
        primitive_count,
        args: DrawCallArgs::DirectUp {
            vertex_stride: 12,
            vertex_data_size: 36,
            vertex_data: Some(vec![0u8; 36]),
        },
    }
}

fn write_trace(dir: &std::path::Path, name: &str, writer: TraceWriter) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, writer.finish()).unwrap();
    path
}

#[test]
fn small_draws_trigger_low_primitives_finding() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = TraceWriter::new(0);
    writer.push_draw_call(triangle_draw(2));
    writer.push_draw_call(triangle_draw(2));
    writer.push_draw_call(triangle_draw(1));
    writer.push_draw_call(triangle_draw(1));
    let path = write_trace(dir.path(), "frame0.d3d9trace", writer);

    let report = analyze_files(&[path], &DecodeOptions::default());
    assert!(report.failures.is_empty());
    assert_eq!(report.reports.len(), 1);

    let stats = &report.reports[0].stats;
    assert_eq!(stats.total_primitives, 6);
    assert_eq!(stats.total_vertices, 18);

    assert_eq!(report.summary.average_draws_per_frame, 4.0);
    assert_eq!(report.summary.average_primitives_per_draw, 1.5);
    assert_eq!(
        report.findings,
        vec![Finding::LowPrimitivesPerDraw { average: 1.5 }]
    );
}

#[test]
fn immediate_draw_ratio_is_reported_across_files() {
    let dir = tempfile::tempdir().unwrap();

    // Two files, four draws each; half of all draws are user-pointer.
    let mut paths = Vec::new();
    for frame in 0..2u32 {
        let mut writer = TraceWriter::new(frame);
        writer.push_draw_call(triangle_draw(200));
        writer.push_draw_call(up_draw(200));
        writer.push_draw_call(triangle_draw(200));
        writer.push_draw_call(up_draw(200));
        paths.push(write_trace(
            dir.path(),
            &format!("frame{frame}.d3d9trace"),
            writer,
        ));
    }

    let report = analyze_files(&paths, &DecodeOptions::default());
    assert_eq!(report.reports.len(), 2);
    assert_eq!(report.summary.immediate_draws, 4);
    // 200 primitives per draw keeps the low-primitives finding quiet, so the
    // ratio finding stands alone at exactly 50%.
    assert_eq!(
        report.findings,
        vec![Finding::HighImmediateDrawRatio {
            ratio: 0.5,
            immediate_draws: 4,
            total_draws: 8,
        }]
    );
}

#[test]
fn corrupt_file_is_skipped_without_aborting_the_batch() {
    let dir = tempfile::tempdir().unwrap();

    let mut good = TraceWriter::new(1);
    good.push_draw_call(triangle_draw(500));
    let good_path = write_trace(dir.path(), "good.d3d9trace", good);

    let bad_path = dir.path().join("bad.d3d9trace");
    fs::write(&bad_path, b"not a trace file at all").unwrap();

    let report = analyze_files(
        &[good_path.clone(), bad_path.clone()],
        &DecodeOptions::default(),
    );
    assert_eq!(report.reports.len(), 1);
    assert_eq!(report.reports[0].path, good_path);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, bad_path);
    assert_eq!(report.summary.frames, 1);
    assert_eq!(report.summary.total_primitives, 500);
}

#[test]
fn draw_phase_corruption_still_yields_resource_statistics() {
    use d3d9trace::{ResourceDesc, ResourceEntry, ResourceType};

    let dir = tempfile::tempdir().unwrap();
    let mut writer = TraceWriter::new(1);
    writer.push_draw_call(triangle_draw(1));
    writer.push_resource(ResourceEntry {
        id: 1,
        kind: ResourceType::Texture2d,
        data_offset: 0,
        data_size: 9000,
        desc: ResourceDesc::Texture2d {
            width: 32,
            height: 32,
            mip_levels: 6,
            format: 21,
        },
    });
    let mut bytes = writer.finish();
    bytes[TRACE_HEADER_SIZE as usize] = 99; // corrupt the draw discriminant
    let path = dir.path().join("corrupt_draws.d3d9trace");
    fs::write(&path, bytes).unwrap();

    let report = analyze_files(&[path], &DecodeOptions::default());
    assert_eq!(report.reports.len(), 1);
    let report = &report.reports[0];
    assert!(report.frame.draw_call_error.is_some());
    assert_eq!(report.stats.draw_calls, 0);
    assert_eq!(report.stats.total_resource_bytes, 9000);
    assert_eq!(
        report.stats.resource_type_counts.get(&ResourceType::Texture2d),
        Some(&1)
    );
}

#[test]
fn results_come_back_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for frame in 0..16u32 {
        let mut writer = TraceWriter::new(frame);
        writer.push_draw_call(triangle_draw(frame + 1));
        paths.push(write_trace(
            dir.path(),
            &format!("frame{frame:02}.d3d9trace"),
            writer,
        ));
    }
    let report = analyze_files(&paths, &DecodeOptions::default());
    assert_eq!(report.reports.len(), 16);
    for (i, frame_report) in report.reports.iter().enumerate() {
        assert_eq!(frame_report.path, paths[i]);
        assert_eq!(frame_report.frame.header.frame_number, i as u32);
    }
}

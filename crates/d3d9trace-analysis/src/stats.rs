use std::collections::BTreeMap;

use d3d9trace::{DrawCallKind, PrimitiveType, ResourceType, TraceFrame};

/// Per-frame histograms and totals derived from one decoded trace.
///
/// This is a pure reduction over the records the decode actually produced
/// (a truncated table contributes only what was seen), so it can be
/// recomputed from the same `TraceFrame` at any time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStatistics {
    pub frame_number: u32,
    /// Draw-call records decoded (not the header's declared count).
    pub draw_calls: u64,
    pub draw_kind_counts: BTreeMap<DrawCallKind, u64>,
    pub primitive_type_counts: BTreeMap<PrimitiveType, u64>,
    pub total_primitives: u64,
    pub total_vertices: u64,
    /// Draws whose vertex/index data was supplied inline (user-pointer
    /// variants); each one forces a fresh upload.
    pub immediate_draws: u64,
    pub resource_type_counts: BTreeMap<ResourceType, u64>,
    pub total_resource_bytes: u64,
}

impl FrameStatistics {
    pub fn from_frame(frame: &TraceFrame) -> Self {
        let mut stats = FrameStatistics {
            frame_number: frame.header.frame_number,
            ..FrameStatistics::default()
        };

        for call in &frame.draw_calls {
            stats.draw_calls += 1;
            *stats.draw_kind_counts.entry(call.kind()).or_insert(0) += 1;
            *stats
                .primitive_type_counts
                .entry(call.primitive_type)
                .or_insert(0) += 1;
            stats.total_primitives += u64::from(call.primitive_count);
            stats.total_vertices += call.vertex_count();
            if call.kind().is_user_pointer() {
                stats.immediate_draws += 1;
            }
        }

        for entry in &frame.resources {
            *stats.resource_type_counts.entry(entry.kind).or_insert(0) += 1;
            stats.total_resource_bytes += entry.data_size;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use d3d9trace::{
        decode_frame, DecodeOptions, DrawCall, DrawCallArgs, ResourceDesc, ResourceEntry,
        TraceWriter,
    };
    use std::io::Cursor;

    fn decoded(builder: TraceWriter) -> TraceFrame {
        decode_frame(Cursor::new(builder.finish()), &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn accumulates_draw_and_resource_totals() {
        let mut writer = TraceWriter::new(3);
        writer.push_draw_call(DrawCall {
            primitive_type: PrimitiveType::TriangleList,
            has_state_delta: false,
            primitive_count: 10,
            args: DrawCallArgs::Direct { start_vertex: 0 },
        });
        writer.push_draw_call(DrawCall {
            primitive_type: PrimitiveType::LineStrip,
            has_state_delta: false,
            primitive_count: 4,
            args: DrawCallArgs::DirectUp {
                vertex_stride: 12,
                vertex_data_size: 0,
                vertex_data: None,
            },
        });
        writer.push_resource(ResourceEntry {
            id: 1,
            kind: ResourceType::VertexBuffer,
            data_offset: 0,
            data_size: 2048,
            desc: ResourceDesc::VertexBuffer {
                size: 2048,
                usage: 0,
                fvf: 0,
                pool: 0,
            },
        });

        let stats = FrameStatistics::from_frame(&decoded(writer));
        assert_eq!(stats.frame_number, 3);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.total_primitives, 14);
        // 10 triangles = 30 vertices; 4-segment line strip = 5 vertices.
        assert_eq!(stats.total_vertices, 35);
        assert_eq!(stats.immediate_draws, 1);
        assert_eq!(
            stats.draw_kind_counts.get(&DrawCallKind::DrawPrimitiveUp),
            Some(&1)
        );
        assert_eq!(
            stats.primitive_type_counts.get(&PrimitiveType::LineStrip),
            Some(&1)
        );
        assert_eq!(stats.total_resource_bytes, 2048);
        assert_eq!(
            stats.resource_type_counts.get(&ResourceType::VertexBuffer),
            Some(&1)
        );
    }

    #[test]
    fn unknown_topologies_count_zero_vertices() {
        let mut writer = TraceWriter::new(1);
        writer.push_draw_call(DrawCall {
            primitive_type: PrimitiveType::Unknown(42),
            has_state_delta: false,
            primitive_count: 100,
            args: DrawCallArgs::Direct { start_vertex: 0 },
        });
        let stats = FrameStatistics::from_frame(&decoded(writer));
        assert_eq!(stats.total_primitives, 100);
        assert_eq!(stats.total_vertices, 0);
    }
}

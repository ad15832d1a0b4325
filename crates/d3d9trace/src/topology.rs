use std::fmt;

/// D3D9 primitive topologies as they appear in draw-call records.
///
/// This is a semantic enum rather than the raw D3D9 constants, but it keeps
/// an `Unknown` carrier: the capture format may grow new topology codes, and
/// an analyzer tolerates them (they simply contribute zero vertices) instead
/// of rejecting the trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveType {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
    Unknown(u8),
}

impl PrimitiveType {
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => PrimitiveType::PointList,
            2 => PrimitiveType::LineList,
            3 => PrimitiveType::LineStrip,
            4 => PrimitiveType::TriangleList,
            5 => PrimitiveType::TriangleStrip,
            6 => PrimitiveType::TriangleFan,
            other => PrimitiveType::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            PrimitiveType::PointList => 1,
            PrimitiveType::LineList => 2,
            PrimitiveType::LineStrip => 3,
            PrimitiveType::TriangleList => 4,
            PrimitiveType::TriangleStrip => 5,
            PrimitiveType::TriangleFan => 6,
            PrimitiveType::Unknown(raw) => raw,
        }
    }

    /// Vertices consumed to assemble `primitive_count` primitives of this
    /// topology.
    pub fn vertex_count(self, primitive_count: u32) -> u64 {
        let n = u64::from(primitive_count);
        match self {
            PrimitiveType::PointList => n,
            PrimitiveType::LineList => n * 2,
            PrimitiveType::LineStrip => n + 1,
            PrimitiveType::TriangleList => n * 3,
            PrimitiveType::TriangleStrip => n + 2,
            PrimitiveType::TriangleFan => n + 2,
            PrimitiveType::Unknown(_) => 0,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::PointList => f.write_str("point_list"),
            PrimitiveType::LineList => f.write_str("line_list"),
            PrimitiveType::LineStrip => f.write_str("line_strip"),
            PrimitiveType::TriangleList => f.write_str("triangle_list"),
            PrimitiveType::TriangleStrip => f.write_str("triangle_strip"),
            PrimitiveType::TriangleFan => f.write_str("triangle_fan"),
            PrimitiveType::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}
